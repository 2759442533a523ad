//! Working-hours and time-off models.
//!
//! Defines when an employee is on the floor (working hours) and when they
//! are away (time off), plus the minute-resolution interval type used by
//! every availability computation.
//!
//! # Time Model
//! All intervals are minutes relative to midnight of a single calendar
//! date. Working windows never span two dates.
//!
//! # Precedence
//! Time off overrides working hours. An explicit-date working-hours entry
//! overrides the weekly entry for the same weekday.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time interval [start, end) in minutes from midnight.
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeWindow {
    /// Interval start (minutes, inclusive).
    pub start_min: i64,
    /// Interval end (minutes, exclusive).
    pub end_min: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }

    /// Window covering `[start, end)` wall-clock times.
    pub fn between(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(minute_of_day(start), minute_of_day(end))
    }

    /// Duration of this window (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether the window has no extent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end_min <= self.start_min
    }

    /// Whether a minute falls within this window.
    #[inline]
    pub fn contains(&self, minute: i64) -> bool {
        minute >= self.start_min && minute < self.end_min
    }

    /// Whether `other` lies entirely inside this window.
    pub fn covers(&self, other: &Self) -> bool {
        other.start_min >= self.start_min && other.end_min <= self.end_min
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// The overlapping part of two windows, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start_min.max(other.start_min);
        let end = self.end_min.min(other.end_min);
        (end > start).then(|| Self::new(start, end))
    }

    /// Removes every busy window from `self`, returning the remaining gaps
    /// in ascending order.
    ///
    /// `busy` may be unsorted and overlapping.
    pub fn subtract(&self, busy: &[TimeWindow]) -> Vec<TimeWindow> {
        let mut free = Vec::new();
        let mut cursor = self.start_min;

        for b in merge_windows(busy) {
            if b.end_min <= cursor {
                continue;
            }
            if b.start_min >= self.end_min {
                break;
            }
            if b.start_min > cursor {
                free.push(Self::new(cursor, b.start_min));
            }
            cursor = cursor.max(b.end_min);
        }

        if cursor < self.end_min {
            free.push(Self::new(cursor, self.end_min));
        }
        free
    }
}

/// Sorts windows and unions any that overlap or touch.
pub fn merge_windows(windows: &[TimeWindow]) -> Vec<TimeWindow> {
    let mut sorted: Vec<TimeWindow> = windows.iter().copied().filter(|w| !w.is_empty()).collect();
    sorted.sort();

    let mut merged: Vec<TimeWindow> = Vec::with_capacity(sorted.len());
    for w in sorted {
        match merged.last_mut() {
            Some(last) if w.start_min <= last.end_min => {
                last.end_min = last.end_min.max(w.end_min);
            }
            _ => merged.push(w),
        }
    }
    merged
}

/// Minutes elapsed since midnight.
#[inline]
pub fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Minutes from midnight of `date` to `at`. Negative before the date,
/// `>= MINUTES_PER_DAY` after it.
pub fn minutes_since(date: NaiveDate, at: NaiveDateTime) -> i64 {
    at.date().signed_duration_since(date).num_days() * MINUTES_PER_DAY + minute_of_day(at.time())
}

/// Which day(s) a working-hours entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingDay {
    /// Every occurrence of this weekday.
    Weekday(Weekday),
    /// One specific date; overrides the weekday entry.
    Date(NaiveDate),
}

/// An employee's working window for a weekday or a specific date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingHoursEntry {
    /// Employee this entry belongs to.
    pub employee_id: String,
    /// Applicable weekday or date.
    pub day: WorkingDay,
    /// Start of the working window.
    pub open: NaiveTime,
    /// End of the working window (exclusive).
    pub close: NaiveTime,
}

impl WorkingHoursEntry {
    /// Weekly recurring hours.
    pub fn weekly(
        employee_id: impl Into<String>,
        weekday: Weekday,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            day: WorkingDay::Weekday(weekday),
            open,
            close,
        }
    }

    /// Hours for one specific date.
    pub fn on_date(
        employee_id: impl Into<String>,
        date: NaiveDate,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            day: WorkingDay::Date(date),
            open,
            close,
        }
    }

    /// Whether this entry applies to `date`.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        match self.day {
            WorkingDay::Weekday(w) => date.weekday() == w,
            WorkingDay::Date(d) => d == date,
        }
    }

    /// Whether this is an explicit-date override.
    pub fn is_date_override(&self) -> bool {
        matches!(self.day, WorkingDay::Date(_))
    }

    /// The working window in minutes.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::between(self.open, self.close)
    }
}

/// A period an employee is away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeOffEntry {
    /// Employee this entry belongs to.
    pub employee_id: String,
    /// Start of the absence.
    pub start: NaiveDateTime,
    /// End of the absence (exclusive).
    pub end: NaiveDateTime,
    /// Free-text reason (vacation, training, ...).
    pub reason: Option<String>,
}

impl TimeOffEntry {
    /// Creates a time-off entry.
    pub fn new(employee_id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            employee_id: employee_id.into(),
            start,
            end,
            reason: None,
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The part of this absence that falls on `date`, clipped to the day.
    pub fn window_on(&self, date: NaiveDate) -> Option<TimeWindow> {
        let raw = TimeWindow::new(minutes_since(date, self.start), minutes_since(date, self.end));
        raw.intersect(&TimeWindow::new(0, MINUTES_PER_DAY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(100, 200);
        assert_eq!(w.duration_min(), 100);
        assert!(w.contains(100));
        assert!(w.contains(199));
        assert!(!w.contains(200)); // exclusive end
        assert!(!w.contains(50));
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(0, 100);
        let b = TimeWindow::new(50, 150);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = TimeWindow::new(100, 200); // touching but not overlapping
        assert!(!a.overlaps(&c));
        assert_eq!(a.intersect(&b), Some(TimeWindow::new(50, 100)));
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_merge_windows_unions_overlaps() {
        let merged = merge_windows(&[
            TimeWindow::new(600, 630),
            TimeWindow::new(540, 560),
            TimeWindow::new(620, 660),
            TimeWindow::new(660, 680), // touching
            TimeWindow::new(700, 700), // empty, dropped
        ]);
        assert_eq!(merged, vec![TimeWindow::new(540, 560), TimeWindow::new(600, 680)]);
    }

    #[test]
    fn test_subtract_busy() {
        let day = TimeWindow::new(540, 1020);
        let free = day.subtract(&[TimeWindow::new(600, 630), TimeWindow::new(500, 560)]);
        assert_eq!(free, vec![TimeWindow::new(560, 600), TimeWindow::new(630, 1020)]);

        let fully_busy = day.subtract(&[TimeWindow::new(0, 1440)]);
        assert!(fully_busy.is_empty());

        let untouched = day.subtract(&[]);
        assert_eq!(untouched, vec![day]);
    }

    #[test]
    fn test_working_hours_applies() {
        // 2026-10-19 is a Monday
        let weekly = WorkingHoursEntry::weekly("E1", Weekday::Mon, t(9, 0), t(17, 0));
        assert!(weekly.applies_to(d(2026, 10, 19)));
        assert!(!weekly.applies_to(d(2026, 10, 20)));
        assert!(!weekly.is_date_override());
        assert_eq!(weekly.window(), TimeWindow::new(540, 1020));

        let special = WorkingHoursEntry::on_date("E1", d(2026, 10, 20), t(12, 0), t(14, 0));
        assert!(special.applies_to(d(2026, 10, 20)));
        assert!(special.is_date_override());
    }

    #[test]
    fn test_time_off_clipped_to_day() {
        let off = TimeOffEntry::new(
            "E1",
            d(2026, 10, 18).and_time(t(20, 0)),
            d(2026, 10, 19).and_time(t(11, 0)),
        )
        .with_reason("travel");

        assert_eq!(off.window_on(d(2026, 10, 19)), Some(TimeWindow::new(0, 660)));
        assert_eq!(off.window_on(d(2026, 10, 18)), Some(TimeWindow::new(1200, 1440)));
        assert_eq!(off.window_on(d(2026, 10, 20)), None);
        assert_eq!(off.reason.as_deref(), Some("travel"));
    }

    #[test]
    fn test_minutes_since() {
        let date = d(2026, 10, 19);
        assert_eq!(minutes_since(date, date.and_time(t(10, 30))), 630);
        assert_eq!(minutes_since(date, d(2026, 10, 20).and_time(t(0, 15))), 1455);
        assert_eq!(minutes_since(date, d(2026, 10, 18).and_time(t(23, 0))), -60);
    }
}
