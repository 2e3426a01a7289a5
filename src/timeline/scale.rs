//! Timeline scale mapping
//!
//! Bidirectional mapping between calendar dates and a percentage
//! position within a bounded viewing window, plus month/quarter axis
//! label generation. The window end is computed with calendar-month
//! arithmetic, not fixed 30-day months, so percentages are
//! month-length-weighted.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

/// The (start date, month count) pair bounding the horizontal scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    pub view_start: NaiveDate,
    pub view_months: u32,
}

impl TimelineWindow {
    pub fn new(view_start: NaiveDate, view_months: u32) -> Self {
        Self {
            view_start,
            view_months,
        }
    }

    /// Exclusive window end: view_start + view_months calendar months
    pub fn view_end(&self) -> NaiveDate {
        self.view_start + Months::new(self.view_months)
    }

    fn start_ms(&self) -> i64 {
        midnight_ms(self.view_start)
    }

    fn total_ms(&self) -> i64 {
        midnight_ms(self.view_end()) - self.start_ms()
    }
}

fn midnight_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight always exists")
        .and_utc()
        .timestamp_millis()
}

/// Percent position of a date within the window. Dates outside the
/// window produce values outside [0, 100]; callers clamp or cull.
pub fn date_to_percent(date: NaiveDate, window: &TimelineWindow) -> f64 {
    datetime_to_percent(
        date.and_hms_opt(0, 0, 0).expect("midnight always exists"),
        window,
    )
}

/// Percent position of an instant within the window
pub fn datetime_to_percent(instant: NaiveDateTime, window: &TimelineWindow) -> f64 {
    let date_ms = instant.and_utc().timestamp_millis() - window.start_ms();
    date_ms as f64 / window.total_ms() as f64 * 100.0
}

/// Inverse of [`datetime_to_percent`]: the instant at a percent
/// position. Used to translate a pointer-drag position back into a
/// calendar date during interactive date editing.
pub fn percent_to_date(percent: f64, window: &TimelineWindow) -> NaiveDateTime {
    let offset_ms = (percent / 100.0 * window.total_ms() as f64) as i64;
    chrono::DateTime::from_timestamp_millis(window.start_ms() + offset_ms)
        .expect("window instants are representable")
        .naive_utc()
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month-sized header cell
#[derive(Debug, Clone, PartialEq)]
pub struct MonthLabel {
    pub month: &'static str,
    pub year: i32,
    pub start_percent: f64,
    pub width_percent: f64,
}

/// One quarter-sized header cell, clipped to the window boundary
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterLabel {
    pub quarter: &'static str,
    pub year: i32,
    pub start_percent: f64,
    pub width_percent: f64,
}

/// Lazy iterator over the window's month labels. Restart by calling
/// [`month_labels`] again (the iterator is also `Clone`).
#[derive(Debug, Clone)]
pub struct MonthLabels {
    window: TimelineWindow,
    index: u32,
}

impl Iterator for MonthLabels {
    type Item = MonthLabel;

    fn next(&mut self) -> Option<MonthLabel> {
        if self.index >= self.window.view_months {
            return None;
        }
        let month_start = self.window.view_start + Months::new(self.index);
        let month_end = month_start + Months::new(1);
        let start_percent = date_to_percent(month_start, &self.window);
        let width_percent = date_to_percent(month_end, &self.window) - start_percent;
        self.index += 1;

        Some(MonthLabel {
            month: MONTH_NAMES[month_start.month0() as usize],
            year: month_start.year(),
            start_percent,
            width_percent,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.window.view_months - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthLabels {}

pub fn month_labels(window: &TimelineWindow) -> MonthLabels {
    MonthLabels {
        window: *window,
        index: 0,
    }
}

/// Lazy iterator over the window's quarter labels. A quarter whose
/// calendar start precedes the window start, or whose end exceeds the
/// window end, is truncated to the overlap.
#[derive(Debug, Clone)]
pub struct QuarterLabels {
    window: TimelineWindow,
    cursor: NaiveDate,
}

const QUARTER_NAMES: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// Calendar start of the quarter containing `date`
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let quarter = date.month0() / 3;
    NaiveDate::from_ymd_opt(date.year(), quarter * 3 + 1, 1).expect("quarter months are valid")
}

/// Calendar start of the quarter after the one containing `date`
pub fn next_quarter_start(date: NaiveDate) -> NaiveDate {
    quarter_start(date) + Months::new(3)
}

impl Iterator for QuarterLabels {
    type Item = QuarterLabel;

    fn next(&mut self) -> Option<QuarterLabel> {
        let view_end = self.window.view_end();
        if self.cursor >= view_end {
            return None;
        }
        let q_start = quarter_start(self.cursor);
        let q_end = next_quarter_start(self.cursor);

        let effective_start = q_start.max(self.window.view_start);
        let effective_end = q_end.min(view_end);

        let start_percent = date_to_percent(effective_start, &self.window);
        let width_percent = date_to_percent(effective_end, &self.window) - start_percent;

        let label = QuarterLabel {
            quarter: QUARTER_NAMES[(self.cursor.month0() / 3) as usize],
            year: self.cursor.year(),
            start_percent,
            width_percent,
        };
        self.cursor = q_end;
        Some(label)
    }
}

pub fn quarter_labels(window: &TimelineWindow) -> QuarterLabels {
    QuarterLabels {
        window: *window,
        cursor: window.view_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(y: i32, m: u32, d: u32, months: u32) -> TimelineWindow {
        TimelineWindow::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), months)
    }

    #[test]
    fn test_window_end_uses_calendar_months() {
        let w = window(2024, 1, 1, 12);
        assert_eq!(w.view_end(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_midyear_is_roughly_half() {
        // 2024-07-01 in a Jan-Dec 2024 window: month-length-weighted,
        // not exactly 50 (H1 of a leap year is 182 of 366 days)
        let w = window(2024, 1, 1, 12);
        let p = date_to_percent(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), &w);
        assert!((p - 50.0).abs() < 1.0, "got {}", p);
        assert!((p - 182.0 / 366.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_window_dates_are_not_clamped() {
        let w = window(2024, 1, 1, 12);
        assert!(date_to_percent(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(), &w) < 0.0);
        assert!(date_to_percent(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), &w) > 100.0);
    }

    #[test]
    fn test_percent_round_trip() {
        let w = window(2024, 3, 1, 6);
        for p in [0.0, 12.5, 33.3, 50.0, 99.9, 100.0] {
            let instant = percent_to_date(p, &w);
            let back = datetime_to_percent(instant, &w);
            assert!((back - p).abs() < 1e-6, "{} -> {}", p, back);
        }
    }

    #[test]
    fn test_month_widths_sum_to_100() {
        let w = window(2024, 1, 1, 12);
        let total: f64 = month_labels(&w).map(|m| m.width_percent).sum();
        assert!((total - 100.0).abs() < 1e-9, "got {}", total);
        assert_eq!(month_labels(&w).count(), 12);
    }

    #[test]
    fn test_month_labels_carry_names_and_years() {
        let w = window(2024, 11, 1, 3);
        let labels: Vec<MonthLabel> = month_labels(&w).collect();
        assert_eq!(labels[0].month, "Nov");
        assert_eq!(labels[0].year, 2024);
        assert_eq!(labels[2].month, "Jan");
        assert_eq!(labels[2].year, 2025);
    }

    #[test]
    fn test_quarter_widths_sum_to_100() {
        let w = window(2024, 2, 1, 12);
        let total: f64 = quarter_labels(&w).map(|q| q.width_percent).sum();
        assert!((total - 100.0).abs() < 1e-9, "got {}", total);
    }

    #[test]
    fn test_partial_quarters_are_clipped() {
        // Window starts mid-quarter (Feb) and spans 12 months, so the
        // first Q1 segment covers only Feb-Mar and the final Q1 segment
        // only Jan
        let w = window(2024, 2, 1, 12);
        let labels: Vec<QuarterLabel> = quarter_labels(&w).collect();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0].quarter, "Q1");
        assert_eq!(labels[0].year, 2024);
        assert_eq!(labels.last().unwrap().quarter, "Q1");
        assert_eq!(labels.last().unwrap().year, 2025);
        // Clipped first quarter is narrower than the full Q2
        assert!(labels[0].width_percent < labels[1].width_percent);
        assert!((labels[0].start_percent).abs() < 1e-9);
    }

    #[test]
    fn test_label_iterators_are_restartable() {
        let w = window(2024, 1, 1, 6);
        let first: Vec<MonthLabel> = month_labels(&w).collect();
        let second: Vec<MonthLabel> = month_labels(&w).collect();
        assert_eq!(first, second);
    }
}
