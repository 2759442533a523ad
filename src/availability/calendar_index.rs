//! Working-window and time-off lookup per employee and date.

use chrono::NaiveDate;

use crate::models::{merge_windows, TimeOffEntry, TimeWindow, WorkingHoursEntry};

/// Borrowed view over working hours and time off.
///
/// Pure reads: nothing here mutates or caches.
#[derive(Debug, Clone, Copy)]
pub struct CalendarIndex<'a> {
    working_hours: &'a [WorkingHoursEntry],
    time_off: &'a [TimeOffEntry],
}

impl<'a> CalendarIndex<'a> {
    /// Creates an index over the given entries.
    pub fn new(working_hours: &'a [WorkingHoursEntry], time_off: &'a [TimeOffEntry]) -> Self {
        Self {
            working_hours,
            time_off,
        }
    }

    /// The employee's working window on `date`, if any.
    ///
    /// An explicit-date entry takes precedence over the weekday entry.
    /// Among entries of the same kind the first one wins.
    pub fn working_window(&self, employee_id: &str, date: NaiveDate) -> Option<TimeWindow> {
        let mut weekly = None;
        for entry in self
            .working_hours
            .iter()
            .filter(|e| e.employee_id == employee_id && e.applies_to(date))
        {
            if entry.is_date_override() {
                return Some(entry.window()).filter(|w| !w.is_empty());
            }
            if weekly.is_none() {
                weekly = Some(entry);
            }
        }
        weekly.map(|e| e.window()).filter(|w| !w.is_empty())
    }

    /// Time off on `date`, clipped to the day, sorted and unioned.
    pub fn time_off_windows(&self, employee_id: &str, date: NaiveDate) -> Vec<TimeWindow> {
        let raw: Vec<TimeWindow> = self
            .time_off
            .iter()
            .filter(|t| t.employee_id == employee_id)
            .filter_map(|t| t.window_on(date))
            .collect();
        merge_windows(&raw)
    }

    /// Whether the employee has at least one working minute on `date`.
    ///
    /// Partial time off leaves the day working; only time off covering the
    /// whole window makes this false.
    pub fn is_working(&self, employee_id: &str, date: NaiveDate) -> bool {
        match self.working_window(employee_id, date) {
            None => false,
            Some(window) => !window
                .subtract(&self.time_off_windows(employee_id, date))
                .is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2026-10-19 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn hours() -> Vec<WorkingHoursEntry> {
        vec![
            WorkingHoursEntry::weekly("E1", Weekday::Mon, t(9, 0), t(17, 0)),
            WorkingHoursEntry::weekly("E1", Weekday::Tue, t(9, 0), t(17, 0)),
            WorkingHoursEntry::weekly("E2", Weekday::Mon, t(12, 0), t(20, 0)),
        ]
    }

    #[test]
    fn test_not_working_without_entry() {
        let hours = hours();
        let cal = CalendarIndex::new(&hours, &[]);
        let wednesday = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        assert!(!cal.is_working("E1", wednesday));
        assert!(cal.working_window("E1", wednesday).is_none());
        assert!(!cal.is_working("nobody", monday()));
    }

    #[test]
    fn test_weekly_window() {
        let hours = hours();
        let cal = CalendarIndex::new(&hours, &[]);
        assert_eq!(cal.working_window("E1", monday()), Some(TimeWindow::new(540, 1020)));
        assert_eq!(cal.working_window("E2", monday()), Some(TimeWindow::new(720, 1200)));
        assert!(cal.is_working("E1", monday()));
    }

    #[test]
    fn test_date_override_wins() {
        let mut hours = hours();
        // Listed after the weekly entry, still takes precedence.
        hours.push(WorkingHoursEntry::on_date("E1", monday(), t(13, 0), t(15, 0)));
        let cal = CalendarIndex::new(&hours, &[]);
        assert_eq!(cal.working_window("E1", monday()), Some(TimeWindow::new(780, 900)));
    }

    #[test]
    fn test_partial_time_off_still_working() {
        let hours = hours();
        let off = vec![TimeOffEntry::new(
            "E1",
            monday().and_time(t(9, 0)),
            monday().and_time(t(12, 0)),
        )];
        let cal = CalendarIndex::new(&hours, &off);
        assert!(cal.is_working("E1", monday()));
        assert_eq!(cal.time_off_windows("E1", monday()), vec![TimeWindow::new(540, 720)]);
    }

    #[test]
    fn test_full_time_off_not_working() {
        let hours = hours();
        // Two overlapping entries that together cover the window.
        let off = vec![
            TimeOffEntry::new("E1", monday().and_time(t(8, 0)), monday().and_time(t(13, 0))),
            TimeOffEntry::new("E1", monday().and_time(t(12, 0)), monday().and_time(t(18, 0))),
        ];
        let cal = CalendarIndex::new(&hours, &off);
        assert!(!cal.is_working("E1", monday()));
        assert_eq!(cal.time_off_windows("E1", monday()), vec![TimeWindow::new(480, 1080)]);
        // Other staff unaffected.
        assert!(cal.is_working("E2", monday()));
    }

    #[test]
    fn test_multi_day_time_off() {
        let hours = hours();
        let tuesday = monday().succ_opt().unwrap();
        let off = vec![TimeOffEntry::new(
            "E1",
            monday().and_time(t(15, 0)),
            tuesday.and_time(t(23, 0)),
        )];
        let cal = CalendarIndex::new(&hours, &off);
        assert!(cal.is_working("E1", monday()));
        assert!(!cal.is_working("E1", tuesday));
    }
}
