//! Overview export
//!
//! Nested goal → initiative → deliverable structure and the markdown
//! rendering of it, plus status tallies for the legend.

use crate::model::{Deliverable, DeliverableStatus, Goal, Initiative, Roadmap};
use serde::Serialize;

/// A goal with its initiatives and their deliverables, priority/order
/// sorted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithChildren {
    #[serde(flatten)]
    pub goal: Goal,
    pub initiatives: Vec<InitiativeWithChildren>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeWithChildren {
    #[serde(flatten)]
    pub initiative: Initiative,
    pub deliverables: Vec<Deliverable>,
}

/// Join the flat collections into the nested render structure
pub fn build_nested(roadmap: &Roadmap) -> Vec<GoalWithChildren> {
    let mut goals: Vec<&Goal> = roadmap.goals.iter().collect();
    goals.sort_by_key(|g| g.priority);

    goals
        .into_iter()
        .map(|goal| GoalWithChildren {
            goal: goal.clone(),
            initiatives: roadmap
                .initiatives_of(&goal.id)
                .into_iter()
                .map(|initiative| InitiativeWithChildren {
                    initiative: initiative.clone(),
                    deliverables: roadmap
                        .deliverables_of(&initiative.id)
                        .into_iter()
                        .cloned()
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Deliverable counts by status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTally {
    pub shipped: usize,
    pub in_progress: usize,
    pub planned: usize,
    pub total: usize,
}

pub fn tally_statuses(roadmap: &Roadmap) -> StatusTally {
    let count = |status: DeliverableStatus| {
        roadmap
            .deliverables
            .iter()
            .filter(|d| d.status == status)
            .count()
    };
    StatusTally {
        shipped: count(DeliverableStatus::Shipped),
        in_progress: count(DeliverableStatus::InProgress),
        planned: count(DeliverableStatus::Planned),
        total: roadmap.deliverables.len(),
    }
}

fn format_status(status: DeliverableStatus) -> &'static str {
    match status {
        DeliverableStatus::Shipped => "SHIPPED",
        DeliverableStatus::InProgress => "IN PROGRESS",
        DeliverableStatus::Planned => "PLANNED",
    }
}

/// Render the roadmap overview as markdown
pub fn overview_markdown(roadmap: &Roadmap) -> String {
    let nested = build_nested(roadmap);
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", roadmap.title));
    lines.push(String::new());

    for goal in &nested {
        lines.push("---".to_string());
        lines.push(String::new());
        lines.push(format!("## [P{}] {}", goal.goal.priority, goal.goal.name));

        if let Some(description) = &goal.goal.description {
            lines.push(format!("> {}", description));
            lines.push(String::new());
        }

        lines.push(format!("**Desired Outcome:** {}", goal.goal.desired_outcome));
        lines.push(String::new());

        for initiative in &goal.initiatives {
            lines.push(format!("### {}", initiative.initiative.name));
            lines.push(format!(
                "**Ideal Outcome:** {}",
                initiative.initiative.ideal_outcome
            ));
            lines.push(String::new());

            if !initiative.deliverables.is_empty() {
                for deliverable in &initiative.deliverables {
                    lines.push(format!(
                        "- [{}] {}",
                        format_status(deliverable.status),
                        deliverable.name
                    ));
                }
                lines.push(String::new());
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Roadmap {
        let mut r = Roadmap::new();
        r.goals.push(Goal {
            id: "g1".into(),
            name: "Grow".into(),
            description: Some("Core bet".into()),
            desired_outcome: "2x users".into(),
            priority: 1,
            order: 0,
        });
        r.initiatives.push(Initiative {
            id: "i1".into(),
            goal_id: "g1".into(),
            name: "Onboarding".into(),
            ideal_outcome: "Smooth signup".into(),
            order: 0,
        });
        r.deliverables.push(Deliverable {
            id: "d1".into(),
            initiative_id: "i1".into(),
            name: "New signup flow".into(),
            description: None,
            status: DeliverableStatus::InProgress,
            start_date: None,
            end_date: None,
            order: 0,
        });
        r
    }

    #[test]
    fn test_nested_structure_groups_children() {
        let nested = build_nested(&sample());
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].initiatives.len(), 1);
        assert_eq!(nested[0].initiatives[0].deliverables.len(), 1);
    }

    #[test]
    fn test_markdown_shape() {
        let md = overview_markdown(&sample());
        assert!(md.starts_with("# Product Roadmap"));
        assert!(md.contains("## [P1] Grow"));
        assert!(md.contains("> Core bet"));
        assert!(md.contains("**Ideal Outcome:** Smooth signup"));
        assert!(md.contains("- [IN PROGRESS] New signup flow"));
    }

    #[test]
    fn test_status_tally() {
        let tally = tally_statuses(&sample());
        assert_eq!(tally.in_progress, 1);
        assert_eq!(tally.shipped, 0);
        assert_eq!(tally.total, 1);
    }
}
