//! Gantt row construction
//!
//! Joins goals, initiatives and deliverables into one render record per
//! (goal, initiative) pair, combining lane assignment and layout
//! metadata. Integrity is assumed to have been validated upstream:
//! dangling references silently produce rows with empty child
//! collections, this layer never raises.

use crate::model::{Deliverable, Goal, Initiative, Roadmap};
use crate::timeline::stack::{stack_deliverables, StackedDeliverable};

/// Height of one deliverable bar in pixels
pub const BAR_HEIGHT: u32 = 24;
/// Vertical gap between stacked bars
pub const BAR_GAP: u32 = 4;
/// Top+bottom padding inside a row
pub const ROW_PADDING: u32 = 8;
/// Minimum row height, applied even for empty rows
pub const MIN_ROW_HEIGHT: u32 = 40;

/// One renderable timeline row
#[derive(Debug, Clone)]
pub struct GanttRow {
    pub goal: Goal,
    /// The initiative, or a synthetic `empty-{goalId}` placeholder when
    /// the goal has no initiatives
    pub initiative: Initiative,
    pub scheduled: Vec<StackedDeliverable>,
    /// Deliverables missing dates, rendered in a separate "needs dates"
    /// sub-row
    pub unscheduled: Vec<Deliverable>,
    /// Lane count − 1; −1 when the row has no scheduled deliverables
    pub max_stack_index: i32,
    pub is_first_in_goal: bool,
    pub is_last_in_goal: bool,
    pub initiative_count_in_goal: usize,
    /// Row height from the lane count, floored at [`MIN_ROW_HEIGHT`]
    pub row_height: u32,
    /// Running vertical offset of this row within its goal's block,
    /// for sticky/merged goal header rendering
    pub offset_in_goal: u32,
}

impl GanttRow {
    /// Whether this row is the placeholder for a goal with no initiatives
    pub fn is_empty_goal(&self) -> bool {
        self.initiative_count_in_goal == 0
    }

    /// Top offset of a bar within the row
    pub fn bar_top_offset(stack_index: usize) -> u32 {
        stack_index as u32 * (BAR_HEIGHT + BAR_GAP) + BAR_GAP
    }
}

fn row_height(max_stack_index: i32) -> u32 {
    let lanes = (max_stack_index + 1) as u32;
    MIN_ROW_HEIGHT.max(lanes * (BAR_HEIGHT + BAR_GAP) + ROW_PADDING)
}

fn placeholder_initiative(goal: &Goal) -> Initiative {
    Initiative {
        id: format!("empty-{}", goal.id),
        goal_id: goal.id.clone(),
        name: "No initiatives".to_string(),
        ideal_outcome: String::new(),
        order: 0,
    }
}

/// Build the full row list, goals in priority order, initiatives in
/// order within each goal. Every goal yields at least one row.
pub fn build_rows(roadmap: &Roadmap) -> Vec<GanttRow> {
    let mut rows = Vec::new();

    let mut goals: Vec<&Goal> = roadmap.goals.iter().collect();
    goals.sort_by_key(|g| g.priority);

    for goal in goals {
        let initiatives = roadmap.initiatives_of(&goal.id);
        let count = initiatives.len();

        if count == 0 {
            rows.push(GanttRow {
                goal: goal.clone(),
                initiative: placeholder_initiative(goal),
                scheduled: Vec::new(),
                unscheduled: Vec::new(),
                max_stack_index: -1,
                is_first_in_goal: true,
                is_last_in_goal: true,
                initiative_count_in_goal: 0,
                row_height: row_height(-1),
                offset_in_goal: 0,
            });
            continue;
        }

        let mut offset = 0u32;
        for (index, initiative) in initiatives.into_iter().enumerate() {
            let deliverables: Vec<Deliverable> = roadmap
                .deliverables_of(&initiative.id)
                .into_iter()
                .cloned()
                .collect();

            let unscheduled: Vec<Deliverable> = deliverables
                .iter()
                .filter(|d| !d.is_scheduled())
                .cloned()
                .collect();

            let (scheduled, lane_count) = stack_deliverables(&deliverables);
            let max_stack_index = lane_count as i32 - 1;
            let height = row_height(max_stack_index);

            rows.push(GanttRow {
                goal: goal.clone(),
                initiative: initiative.clone(),
                scheduled,
                unscheduled,
                max_stack_index,
                is_first_in_goal: index == 0,
                is_last_in_goal: index == count - 1,
                initiative_count_in_goal: count,
                row_height: height,
                offset_in_goal: offset,
            });

            offset += height;
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliverableStatus;
    use chrono::NaiveDate;

    fn goal(id: &str, priority: u32) -> Goal {
        Goal {
            id: id.into(),
            name: format!("Goal {}", id),
            description: None,
            desired_outcome: "done".into(),
            priority,
            order: priority - 1,
        }
    }

    fn initiative(id: &str, goal_id: &str, order: u32) -> Initiative {
        Initiative {
            id: id.into(),
            goal_id: goal_id.into(),
            name: format!("Initiative {}", id),
            ideal_outcome: "shipped".into(),
            order,
        }
    }

    fn deliverable(id: &str, initiative_id: &str, dates: Option<((i32, u32, u32), (i32, u32, u32))>) -> Deliverable {
        Deliverable {
            id: id.into(),
            initiative_id: initiative_id.into(),
            name: id.into(),
            description: None,
            status: DeliverableStatus::Planned,
            start_date: dates.map(|(s, _)| NaiveDate::from_ymd_opt(s.0, s.1, s.2).unwrap()),
            end_date: dates.map(|(_, e)| NaiveDate::from_ymd_opt(e.0, e.1, e.2).unwrap()),
            order: 0,
        }
    }

    fn sample_roadmap() -> Roadmap {
        let mut r = Roadmap::new();
        r.goals = vec![goal("g2", 2), goal("g1", 1), goal("g3", 3)];
        r.initiatives = vec![
            initiative("i1", "g1", 0),
            initiative("i2", "g1", 1),
            initiative("i3", "g2", 0),
        ];
        r.deliverables = vec![
            deliverable("d1", "i1", Some(((2024, 1, 1), (2024, 1, 10)))),
            deliverable("d2", "i1", Some(((2024, 1, 5), (2024, 1, 15)))),
            deliverable("d3", "i1", None),
            deliverable("dangling", "nope", Some(((2024, 2, 1), (2024, 2, 5)))),
        ];
        r
    }

    #[test]
    fn test_rows_follow_goal_priority() {
        let rows = build_rows(&sample_roadmap());
        let goal_ids: Vec<&str> = rows.iter().map(|r| r.goal.id.as_str()).collect();
        assert_eq!(goal_ids, vec!["g1", "g1", "g2", "g3"]);
    }

    #[test]
    fn test_empty_goal_gets_placeholder_row() {
        let rows = build_rows(&sample_roadmap());
        let empty = rows.iter().find(|r| r.goal.id == "g3").unwrap();
        assert!(empty.is_empty_goal());
        assert_eq!(empty.initiative.id, "empty-g3");
        assert_eq!(empty.max_stack_index, -1);
        assert!(empty.is_first_in_goal && empty.is_last_in_goal);
        assert_eq!(empty.row_height, MIN_ROW_HEIGHT);
    }

    #[test]
    fn test_scheduled_and_unscheduled_are_split() {
        let rows = build_rows(&sample_roadmap());
        let i1 = rows.iter().find(|r| r.initiative.id == "i1").unwrap();
        assert_eq!(i1.scheduled.len(), 2);
        assert_eq!(i1.unscheduled.len(), 1);
        assert_eq!(i1.unscheduled[0].id, "d3");
        // d1 and d2 overlap: two lanes
        assert_eq!(i1.max_stack_index, 1);
        assert_eq!(i1.row_height, 2 * (BAR_HEIGHT + BAR_GAP) + ROW_PADDING);
    }

    #[test]
    fn test_first_last_flags_and_offsets() {
        let rows = build_rows(&sample_roadmap());
        let g1_rows: Vec<&GanttRow> = rows.iter().filter(|r| r.goal.id == "g1").collect();
        assert!(g1_rows[0].is_first_in_goal && !g1_rows[0].is_last_in_goal);
        assert!(!g1_rows[1].is_first_in_goal && g1_rows[1].is_last_in_goal);
        assert_eq!(g1_rows[0].offset_in_goal, 0);
        assert_eq!(g1_rows[1].offset_in_goal, g1_rows[0].row_height);
    }

    #[test]
    fn test_dangling_references_yield_empty_collections() {
        // The "dangling" deliverable points at a nonexistent initiative;
        // it simply appears in no row
        let rows = build_rows(&sample_roadmap());
        let all_ids: Vec<&str> = rows
            .iter()
            .flat_map(|r| r.scheduled.iter().map(|s| s.deliverable.id.as_str()))
            .collect();
        assert!(!all_ids.contains(&"dangling"));
    }

    #[test]
    fn test_bar_top_offset_formula() {
        assert_eq!(GanttRow::bar_top_offset(0), 4);
        assert_eq!(GanttRow::bar_top_offset(2), 60);
    }
}
