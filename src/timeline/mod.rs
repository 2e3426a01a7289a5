//! Timeline layout engine
//!
//! - **stack**: greedy interval partitioning of scheduled deliverables
//!   into non-overlapping vertical lanes
//! - **scale**: date ↔ percent mapping within a bounded viewing window,
//!   plus month/quarter axis labels
//! - **rows**: per-(goal, initiative) render rows combining both

pub mod rows;
pub mod scale;
pub mod stack;

pub use rows::{build_rows, GanttRow, BAR_GAP, BAR_HEIGHT, MIN_ROW_HEIGHT, ROW_PADDING};
pub use scale::{
    date_to_percent, month_labels, percent_to_date, quarter_labels, MonthLabel, QuarterLabel,
    TimelineWindow,
};
pub use stack::{stack_deliverables, StackedDeliverable};
