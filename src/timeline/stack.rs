//! Lane assignment for scheduled deliverables
//!
//! Classical greedy interval partitioning: items sharing a lane never
//! have overlapping [start, end) ranges, and the lane count is minimal
//! (equal to the peak number of simultaneously active items). The lane
//! a given item lands in is deterministic for a given input order but
//! not globally canonical — ties on start date keep input order.

use crate::model::Deliverable;
use chrono::NaiveDate;

/// A deliverable augmented with its assigned vertical lane
#[derive(Debug, Clone, PartialEq)]
pub struct StackedDeliverable {
    pub deliverable: Deliverable,
    /// Zero-based lane index within the row
    pub stack_index: usize,
}

/// Assign lanes to the scheduled deliverables in `deliverables`.
///
/// Unscheduled items (missing either date) are skipped. Returns the
/// stacked items in start-date order together with the lane count.
pub fn stack_deliverables(deliverables: &[Deliverable]) -> (Vec<StackedDeliverable>, usize) {
    let mut scheduled: Vec<&Deliverable> =
        deliverables.iter().filter(|d| d.is_scheduled()).collect();
    // Stable sort: equal start dates keep input order
    scheduled.sort_by_key(|d| d.start_date);

    let mut stacked = Vec::with_capacity(scheduled.len());
    // One entry per lane: the end date of the lane's most recent item
    let mut lane_ends: Vec<NaiveDate> = Vec::new();

    for deliverable in scheduled {
        let (Some(start), Some(end)) = (deliverable.start_date, deliverable.end_date) else {
            continue;
        };

        // First lane whose last item ended on or before this start.
        // A zero-width item (start == end) still occupies its lane.
        let lane = lane_ends.iter().position(|lane_end| *lane_end <= start);
        let stack_index = match lane {
            Some(i) => {
                lane_ends[i] = end;
                i
            }
            None => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
        };

        stacked.push(StackedDeliverable {
            deliverable: deliverable.clone(),
            stack_index,
        });
    }

    (stacked, lane_ends.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliverableStatus;

    fn sched(id: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> Deliverable {
        Deliverable {
            id: id.into(),
            initiative_id: "i1".into(),
            name: id.into(),
            description: None,
            status: DeliverableStatus::Planned,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2),
            order: 0,
        }
    }

    fn lane_of<'a>(stacked: &'a [StackedDeliverable], id: &str) -> usize {
        stacked
            .iter()
            .find(|s| s.deliverable.id == id)
            .map(|s| s.stack_index)
            .unwrap()
    }

    #[test]
    fn test_empty_input_needs_no_lanes() {
        let (stacked, lanes) = stack_deliverables(&[]);
        assert!(stacked.is_empty());
        assert_eq!(lanes, 0);
    }

    #[test]
    fn test_overlap_scenario_from_jan() {
        // D1 Jan1-Jan10, D2 Jan5-Jan15 (overlaps D1), D3 Jan12-Jan20
        // (D1 ended before Jan12, so D3 reuses lane 0)
        let items = vec![
            sched("d1", (2024, 1, 1), (2024, 1, 10)),
            sched("d2", (2024, 1, 5), (2024, 1, 15)),
            sched("d3", (2024, 1, 12), (2024, 1, 20)),
        ];
        let (stacked, lanes) = stack_deliverables(&items);
        assert_eq!(lane_of(&stacked, "d1"), 0);
        assert_eq!(lane_of(&stacked, "d2"), 1);
        assert_eq!(lane_of(&stacked, "d3"), 0);
        assert_eq!(lanes, 2);
    }

    #[test]
    fn test_no_lane_holds_overlapping_ranges() {
        let items = vec![
            sched("a", (2024, 3, 1), (2024, 3, 20)),
            sched("b", (2024, 3, 5), (2024, 3, 10)),
            sched("c", (2024, 3, 8), (2024, 3, 25)),
            sched("d", (2024, 3, 10), (2024, 3, 12)),
            sched("e", (2024, 3, 21), (2024, 3, 30)),
        ];
        let (stacked, _) = stack_deliverables(&items);
        for a in &stacked {
            for b in &stacked {
                if a.deliverable.id == b.deliverable.id || a.stack_index != b.stack_index {
                    continue;
                }
                let (a_start, a_end) = (a.deliverable.start_date.unwrap(), a.deliverable.end_date.unwrap());
                let (b_start, b_end) = (b.deliverable.start_date.unwrap(), b.deliverable.end_date.unwrap());
                let overlap = a_start < b_end && b_start < a_end;
                assert!(!overlap, "{} and {} overlap in the same lane", a.deliverable.id, b.deliverable.id);
            }
        }
    }

    #[test]
    fn test_lane_count_is_minimal() {
        // Three items active simultaneously on Mar 8-10 → exactly 3 lanes
        let items = vec![
            sched("a", (2024, 3, 1), (2024, 3, 20)),
            sched("b", (2024, 3, 5), (2024, 3, 10)),
            sched("c", (2024, 3, 8), (2024, 3, 25)),
            sched("d", (2024, 3, 21), (2024, 3, 30)),
        ];
        let (_, lanes) = stack_deliverables(&items);
        assert_eq!(lanes, 3);
    }

    #[test]
    fn test_back_to_back_ranges_share_a_lane() {
        // end <= start frees the lane, so touching ranges stack flat
        let items = vec![
            sched("a", (2024, 1, 1), (2024, 1, 10)),
            sched("b", (2024, 1, 10), (2024, 1, 20)),
        ];
        let (stacked, lanes) = stack_deliverables(&items);
        assert_eq!(lanes, 1);
        assert!(stacked.iter().all(|s| s.stack_index == 0));
    }

    #[test]
    fn test_zero_width_range_occupies_a_lane() {
        let items = vec![
            sched("a", (2024, 1, 5), (2024, 1, 5)),
            sched("b", (2024, 1, 5), (2024, 1, 8)),
        ];
        let (stacked, lanes) = stack_deliverables(&items);
        // The instant item frees its lane immediately (end <= start),
        // so the second item reuses lane 0
        assert_eq!(lane_of(&stacked, "a"), 0);
        assert_eq!(lane_of(&stacked, "b"), 0);
        assert_eq!(lanes, 1);
    }

    #[test]
    fn test_unscheduled_items_are_skipped() {
        let mut no_dates = sched("x", (2024, 1, 1), (2024, 1, 2));
        no_dates.end_date = None;
        let items = vec![no_dates, sched("y", (2024, 1, 1), (2024, 1, 5))];
        let (stacked, lanes) = stack_deliverables(&items);
        assert_eq!(stacked.len(), 1);
        assert_eq!(stacked[0].deliverable.id, "y");
        assert_eq!(lanes, 1);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let items = vec![
            sched("first", (2024, 6, 1), (2024, 6, 10)),
            sched("second", (2024, 6, 1), (2024, 6, 10)),
        ];
        let (stacked, _) = stack_deliverables(&items);
        assert_eq!(stacked[0].deliverable.id, "first");
        assert_eq!(stacked[0].stack_index, 0);
        assert_eq!(stacked[1].stack_index, 1);
    }
}
