//! Notion property mapping
//!
//! The three roadmap databases use a fixed schema:
//! - Goals: Name (title), Description + "Desired Outcome" (rich_text),
//!   Priority + Order (number)
//! - Initiatives: Name (title), "Ideal Outcome" (rich_text), Goal
//!   (relation), Order (number)
//! - Deliverables: Name (title), Description (rich_text), Status
//!   (select), "Start Date" + "End Date" (date), Initiative (relation),
//!   Order (number)
//!
//! Extraction is lenient: missing or malformed properties fall back to
//! empty strings / zero / planned rather than failing the whole page.

use crate::model::{
    Deliverable, DeliverableDraft, DeliverablePatch, DeliverableStatus, Goal, GoalDraft, GoalPatch,
    Initiative, InitiativeDraft, InitiativePatch,
};
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

// =============================================================================
// Property constructors
// =============================================================================

fn title(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": text } }] })
}

/// Rich text; an empty string produces an empty array, which clears the
/// property upstream
fn rich_text(text: &str) -> Value {
    if text.is_empty() {
        json!({ "rich_text": [] })
    } else {
        json!({ "rich_text": [{ "text": { "content": text } }] })
    }
}

fn number(n: u32) -> Value {
    json!({ "number": n })
}

fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

fn date(d: Option<NaiveDate>) -> Value {
    match d {
        Some(d) => json!({ "date": { "start": d.format("%Y-%m-%d").to_string() } }),
        None => json!({ "date": null }),
    }
}

fn relation(id: &str) -> Value {
    json!({ "relation": [{ "id": id }] })
}

pub fn goal_create_props(draft: &GoalDraft) -> Value {
    json!({
        "Name": title(&draft.name),
        "Description": rich_text(draft.description.as_deref().unwrap_or("")),
        "Desired Outcome": rich_text(&draft.desired_outcome),
        "Priority": number(draft.priority),
        "Order": number(draft.order),
    })
}

pub fn goal_patch_props(patch: &GoalPatch) -> Value {
    let mut props = Map::new();
    if let Some(name) = &patch.name {
        props.insert("Name".into(), title(name));
    }
    if let Some(description) = &patch.description {
        props.insert("Description".into(), rich_text(description));
    }
    if let Some(outcome) = &patch.desired_outcome {
        props.insert("Desired Outcome".into(), rich_text(outcome));
    }
    if let Some(priority) = patch.priority {
        props.insert("Priority".into(), number(priority));
    }
    if let Some(order) = patch.order {
        props.insert("Order".into(), number(order));
    }
    Value::Object(props)
}

pub fn initiative_create_props(draft: &InitiativeDraft) -> Value {
    json!({
        "Name": title(&draft.name),
        "Ideal Outcome": rich_text(&draft.ideal_outcome),
        "Goal": relation(&draft.goal_id),
        "Order": number(draft.order),
    })
}

pub fn initiative_patch_props(patch: &InitiativePatch) -> Value {
    let mut props = Map::new();
    if let Some(name) = &patch.name {
        props.insert("Name".into(), title(name));
    }
    if let Some(outcome) = &patch.ideal_outcome {
        props.insert("Ideal Outcome".into(), rich_text(outcome));
    }
    if let Some(goal_id) = &patch.goal_id {
        props.insert("Goal".into(), relation(goal_id));
    }
    if let Some(order) = patch.order {
        props.insert("Order".into(), number(order));
    }
    Value::Object(props)
}

pub fn deliverable_create_props(draft: &DeliverableDraft) -> Value {
    let mut props = Map::new();
    props.insert("Name".into(), title(&draft.name));
    props.insert(
        "Description".into(),
        rich_text(draft.description.as_deref().unwrap_or("")),
    );
    props.insert("Status".into(), select(draft.status.as_str()));
    props.insert("Initiative".into(), relation(&draft.initiative_id));
    props.insert("Order".into(), number(draft.order));
    if draft.start_date.is_some() {
        props.insert("Start Date".into(), date(draft.start_date));
    }
    if draft.end_date.is_some() {
        props.insert("End Date".into(), date(draft.end_date));
    }
    Value::Object(props)
}

pub fn deliverable_patch_props(patch: &DeliverablePatch) -> Value {
    let mut props = Map::new();
    if let Some(name) = &patch.name {
        props.insert("Name".into(), title(name));
    }
    if let Some(description) = &patch.description {
        props.insert("Description".into(), rich_text(description));
    }
    if let Some(status) = patch.status {
        props.insert("Status".into(), select(status.as_str()));
    }
    if let Some(initiative_id) = &patch.initiative_id {
        props.insert("Initiative".into(), relation(initiative_id));
    }
    // Double-optional dates: explicit null clears the property
    if let Some(start) = patch.start_date {
        props.insert("Start Date".into(), date(start));
    }
    if let Some(end) = patch.end_date {
        props.insert("End Date".into(), date(end));
    }
    if let Some(order) = patch.order {
        props.insert("Order".into(), number(order));
    }
    Value::Object(props)
}

// =============================================================================
// Property extraction
// =============================================================================

fn extract_title(page: &Value, prop: &str) -> String {
    page["properties"][prop]["title"][0]["plain_text"]
        .as_str()
        .unwrap_or("")
        .to_string()
}

fn extract_rich_text(page: &Value, prop: &str) -> String {
    page["properties"][prop]["rich_text"][0]["plain_text"]
        .as_str()
        .unwrap_or("")
        .to_string()
}

fn extract_number(page: &Value, prop: &str) -> u32 {
    page["properties"][prop]["number"].as_u64().unwrap_or(0) as u32
}

fn extract_select(page: &Value, prop: &str) -> String {
    page["properties"][prop]["select"]["name"]
        .as_str()
        .unwrap_or("")
        .to_string()
}

fn extract_date(page: &Value, prop: &str) -> Option<NaiveDate> {
    page["properties"][prop]["date"]["start"]
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn extract_relation(page: &Value, prop: &str) -> String {
    page["properties"][prop]["relation"][0]["id"]
        .as_str()
        .unwrap_or("")
        .to_string()
}

fn extract_id(page: &Value) -> String {
    page["id"].as_str().unwrap_or("").to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub fn goal_from_page(page: &Value) -> Goal {
    Goal {
        id: extract_id(page),
        name: extract_title(page, "Name"),
        description: non_empty(extract_rich_text(page, "Description")),
        desired_outcome: extract_rich_text(page, "Desired Outcome"),
        priority: extract_number(page, "Priority"),
        order: extract_number(page, "Order"),
    }
}

pub fn initiative_from_page(page: &Value) -> Initiative {
    Initiative {
        id: extract_id(page),
        goal_id: extract_relation(page, "Goal"),
        name: extract_title(page, "Name"),
        ideal_outcome: extract_rich_text(page, "Ideal Outcome"),
        order: extract_number(page, "Order"),
    }
}

pub fn deliverable_from_page(page: &Value) -> Deliverable {
    Deliverable {
        id: extract_id(page),
        initiative_id: extract_relation(page, "Initiative"),
        name: extract_title(page, "Name"),
        description: non_empty(extract_rich_text(page, "Description")),
        status: DeliverableStatus::parse(&extract_select(page, "Status"))
            .unwrap_or(DeliverableStatus::Planned),
        start_date: extract_date(page, "Start Date"),
        end_date: extract_date(page, "End Date"),
        order: extract_number(page, "Order"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Value {
        json!({
            "id": "page-1",
            "properties": {
                "Name": { "title": [{ "plain_text": "Ship v2" }] },
                "Description": { "rich_text": [] },
                "Status": { "select": { "name": "in-progress" } },
                "Start Date": { "date": { "start": "2024-01-05" } },
                "End Date": { "date": null },
                "Initiative": { "relation": [{ "id": "init-9" }] },
                "Order": { "number": 3 },
            }
        })
    }

    #[test]
    fn test_deliverable_extraction_with_partial_schedule() {
        let d = deliverable_from_page(&page());
        assert_eq!(d.id, "page-1");
        assert_eq!(d.name, "Ship v2");
        assert_eq!(d.description, None);
        assert_eq!(d.status, DeliverableStatus::InProgress);
        assert_eq!(d.start_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(d.end_date, None);
        assert_eq!(d.initiative_id, "init-9");
        assert_eq!(d.order, 3);
        assert!(!d.is_scheduled());
    }

    #[test]
    fn test_unknown_status_falls_back_to_planned() {
        let mut p = page();
        p["properties"]["Status"]["select"]["name"] = json!("someday");
        assert_eq!(deliverable_from_page(&p).status, DeliverableStatus::Planned);
    }

    #[test]
    fn test_goal_create_props_shape() {
        let props = goal_create_props(&GoalDraft {
            name: "Grow".into(),
            description: None,
            desired_outcome: "2x".into(),
            priority: 1,
            order: 0,
        });
        assert_eq!(props["Name"]["title"][0]["text"]["content"], "Grow");
        // Absent description clears the rich_text property
        assert_eq!(props["Description"]["rich_text"].as_array().unwrap().len(), 0);
        assert_eq!(props["Priority"]["number"], 1);
    }

    #[test]
    fn test_patch_props_only_carry_present_fields() {
        let props = goal_patch_props(&GoalPatch {
            priority: Some(2),
            ..GoalPatch::default()
        });
        let keys: Vec<&String> = props.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Priority"]);
    }

    #[test]
    fn test_deliverable_patch_null_date_clears() {
        let props = deliverable_patch_props(&DeliverablePatch {
            start_date: Some(None),
            ..DeliverablePatch::default()
        });
        assert!(props["Start Date"]["date"].is_null());
    }
}
