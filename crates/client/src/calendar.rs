//! Date picker window for the per-intersection history view.
//!
//! Only today and the six preceding days are selectable; requests for any
//! other date are never sent.

use chrono::{NaiveDate, Utc};
use flower_core::timeline;
use flower_core::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    today: NaiveDate,
}

impl CalendarWindow {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Window ending on the current UTC date.
    pub fn current() -> Self {
        Self::new(Utc::now().date_naive())
    }

    /// Selectable dates, oldest first.
    pub fn dates(&self) -> Vec<NaiveDate> {
        timeline::history_dates(self.today)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        timeline::is_within_history_window(date, self.today)
    }

    /// Request path for the history of `intersection_id` on `date`, or
    /// `None` when the date is outside the window.
    pub fn history_path(&self, intersection_id: DbId, date: NaiveDate) -> Option<String> {
        self.contains(date).then(|| {
            format!(
                "/intersections/{intersection_id}/history?date={}",
                date.format("%Y-%m-%d")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn window_is_seven_days_ending_today() {
        let window = CalendarWindow::new(date(14));
        let dates = window.dates();
        assert_eq!(dates.first(), Some(&date(8)));
        assert_eq!(dates.last(), Some(&date(14)));
    }

    #[test]
    fn dates_outside_window_are_suppressed() {
        let window = CalendarWindow::new(date(14));
        assert_eq!(
            window.history_path(3, date(10)).as_deref(),
            Some("/intersections/3/history?date=2026-03-10")
        );
        assert_eq!(window.history_path(3, date(7)), None);
        assert_eq!(window.history_path(3, date(15)), None);
    }
}
