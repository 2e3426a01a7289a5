//! Roadmap data model
//!
//! A strict three-level tree: Goal → Initiative → Deliverable. Every
//! entity carries an opaque string id; parents are referenced by id
//! (`goal_id`, `initiative_id`). Wire names are camelCase to match the
//! persisted JSON shape and the REST surface.

pub mod validate;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use validate::{
    validate_deliverable_draft, validate_deliverable_patch, validate_goal_draft,
    validate_goal_patch, validate_initiative_draft, validate_initiative_patch,
};

/// Top-level roadmap entry, priority-ordered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub desired_outcome: String,
    /// 1-based, dense, unique. Primary ordering; renumbered on
    /// insert/delete/reorder.
    pub priority: u32,
    /// Secondary legacy ordering field
    pub order: u32,
}

/// Mid-level entry under a Goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: String,
    pub goal_id: String,
    pub name: String,
    pub ideal_outcome: String,
    /// Unique within the parent goal
    pub order: u32,
}

/// Leaf entry under an Initiative, carries status and optional schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: String,
    pub initiative_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: DeliverableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Unique within the parent initiative
    pub order: u32,
}

impl Deliverable {
    /// A deliverable is scheduled iff both dates are present.
    /// Unscheduled deliverables are excluded from timeline placement.
    pub fn is_scheduled(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeliverableStatus {
    Planned,
    InProgress,
    Shipped,
}

impl DeliverableStatus {
    /// Upstream select-property name (matches the wire value)
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliverableStatus::Planned => "planned",
            DeliverableStatus::InProgress => "in-progress",
            DeliverableStatus::Shipped => "shipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(DeliverableStatus::Planned),
            "in-progress" => Some(DeliverableStatus::InProgress),
            "shipped" => Some(DeliverableStatus::Shipped),
            _ => None,
        }
    }
}

/// Display settings persisted with the roadmap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapSettings {
    pub color_theme: ColorTheme,
    pub font_family: String,
}

impl Default for RoadmapSettings {
    fn default() -> Self {
        Self {
            color_theme: ColorTheme::Blue,
            font_family: "system-ui".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Teal,
    Slate,
}

/// The full roadmap aggregate. This is the exact JSON shape the local
/// store persists and import/export round-trips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub id: String,
    pub title: String,
    pub goals: Vec<Goal>,
    pub initiatives: Vec<Initiative>,
    pub deliverables: Vec<Deliverable>,
    pub settings: RoadmapSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Roadmap {
    /// Empty roadmap with default settings
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: "notion-roadmap".to_string(),
            title: "Product Roadmap".to_string(),
            goals: Vec::new(),
            initiatives: Vec::new(),
            deliverables: Vec::new(),
            settings: RoadmapSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn initiative(&self, id: &str) -> Option<&Initiative> {
        self.initiatives.iter().find(|i| i.id == id)
    }

    pub fn deliverable(&self, id: &str) -> Option<&Deliverable> {
        self.deliverables.iter().find(|d| d.id == id)
    }

    /// Initiatives of a goal, sorted by their order field
    pub fn initiatives_of(&self, goal_id: &str) -> Vec<&Initiative> {
        let mut out: Vec<&Initiative> = self
            .initiatives
            .iter()
            .filter(|i| i.goal_id == goal_id)
            .collect();
        out.sort_by_key(|i| i.order);
        out
    }

    /// Deliverables of an initiative, sorted by their order field
    pub fn deliverables_of(&self, initiative_id: &str) -> Vec<&Deliverable> {
        let mut out: Vec<&Deliverable> = self
            .deliverables
            .iter()
            .filter(|d| d.initiative_id == initiative_id)
            .collect();
        out.sort_by_key(|d| d.order);
        out
    }
}

impl Default for Roadmap {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Create / update payloads
// =============================================================================

/// Goal create payload (everything but the id; the server assigns ids)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub desired_outcome: String,
    pub priority: u32,
    pub order: u32,
}

/// Goal partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Goal {
    /// Merge a partial update into this goal
    pub fn apply(&mut self, patch: &GoalPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(outcome) = &patch.desired_outcome {
            self.desired_outcome = outcome.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeDraft {
    pub goal_id: String,
    pub name: String,
    pub ideal_outcome: String,
    pub order: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Initiative {
    pub fn apply(&mut self, patch: &InitiativePatch) {
        if let Some(goal_id) = &patch.goal_id {
            self.goal_id = goal_id.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(outcome) = &patch.ideal_outcome {
            self.ideal_outcome = outcome.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverableDraft {
    pub initiative_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: DeliverableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub order: u32,
}

/// Distinguishes an absent field from an explicit null: absent leaves
/// the value unchanged, null clears it
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Deliverable partial update. Dates are double-optional: absent leaves
/// the date unchanged, explicit null clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverablePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliverableStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Deliverable {
    pub fn apply(&mut self, patch: &DeliverablePatch) {
        if let Some(initiative_id) = &patch.initiative_id {
            self.initiative_id = initiative_id.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deliverable() -> Deliverable {
        Deliverable {
            id: "d1".into(),
            initiative_id: "i1".into(),
            name: "Ship it".into(),
            description: None,
            status: DeliverableStatus::Planned,
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
            order: 0,
        }
    }

    #[test]
    fn test_scheduled_requires_both_dates() {
        let mut d = deliverable();
        assert!(d.is_scheduled());
        d.end_date = None;
        assert!(!d.is_scheduled());
    }

    #[test]
    fn test_patch_null_date_clears() {
        let mut d = deliverable();
        let patch: DeliverablePatch =
            serde_json::from_str(r#"{"startDate":null,"status":"shipped"}"#).unwrap();
        d.apply(&patch);
        assert_eq!(d.start_date, None);
        // Absent endDate must stay untouched
        assert!(d.end_date.is_some());
        assert_eq!(d.status, DeliverableStatus::Shipped);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let d = deliverable();
        let json = serde_json::to_value(&d).unwrap();
        assert!(json.get("initiativeId").is_some());
        assert!(json.get("startDate").is_some());
        assert_eq!(json["status"], "planned");
    }

    #[test]
    fn test_roadmap_round_trip() {
        let mut r = Roadmap::new();
        r.deliverables.push(deliverable());
        let json = serde_json::to_string(&r).unwrap();
        let back: Roadmap = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
