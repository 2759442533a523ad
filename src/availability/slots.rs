//! Free-time and candidate-start computation for one staff member.
//!
//! # Algorithm
//!
//! 1. Resolve the working window for (employee, date). None → no slots.
//! 2. Collect busy intervals: non-cancelled appointments, time off, and
//!    any intervals held by the caller (e.g. other parts of the same
//!    booking).
//! 3. Merge busy intervals and take the complement inside the window.
//! 4. In each free gap, emit every start `t` on the granularity grid
//!    anchored at the window's open time with `t + duration <= gap.end`.
//! 5. Drop starts that have already elapsed (same-day bookings).
//!
//! # Complexity
//! O(b log b + s) where b = busy intervals, s = emitted slots.

use chrono::{NaiveDate, NaiveDateTime};

use super::CalendarIndex;
use crate::config::SchedulingConfig;
use crate::error::ConflictReason;
use crate::models::{merge_windows, minute_of_day, Appointment, Slot, TimeWindow};

/// An interval reserved outside the appointment snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldWindow {
    /// Staff member the interval is held for.
    pub staff_id: String,
    /// Date of the interval.
    pub date: NaiveDate,
    /// Held minutes on that date.
    pub window: TimeWindow,
}

/// How much of a date lies in the past relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Elapsed {
    Nothing,
    /// Starts at or before this minute are gone.
    Until(i64),
    Whole,
}

/// Computes available start times from a snapshot of bookings.
///
/// Stateless between calls: identical inputs give identical output.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime, Weekday};
/// use staff_booking::availability::{CalendarIndex, SlotGenerator};
/// use staff_booking::models::{Appointment, WorkingHoursEntry};
///
/// let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
/// let hours = vec![WorkingHoursEntry::weekly("E1", Weekday::Mon, nine, noon)];
/// let booked = vec![Appointment::new("A1", "E1", "cut", monday.and_time(nine), 60)];
///
/// let generator = SlotGenerator::new(CalendarIndex::new(&hours, &[]), &booked);
/// let slots = generator.available_slots("E1", monday, 60);
/// assert_eq!(slots.first().map(|s| s.to_string()), Some("10:00".to_string()));
/// assert_eq!(slots.last().map(|s| s.to_string()), Some("11:00".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct SlotGenerator<'a> {
    calendar: CalendarIndex<'a>,
    appointments: &'a [Appointment],
    held: Vec<HeldWindow>,
    config: SchedulingConfig,
    now: Option<NaiveDateTime>,
}

impl<'a> SlotGenerator<'a> {
    /// Creates a generator with default settings and no time cutoff.
    pub fn new(calendar: CalendarIndex<'a>, appointments: &'a [Appointment]) -> Self {
        Self {
            calendar,
            appointments,
            held: Vec::new(),
            config: SchedulingConfig::default(),
            now: None,
        }
    }

    /// Sets granularity and lead time.
    pub fn with_config(mut self, config: SchedulingConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the current time used to drop elapsed slots.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Marks an extra interval busy.
    pub fn with_held(mut self, staff_id: impl Into<String>, date: NaiveDate, window: TimeWindow) -> Self {
        self.hold(staff_id, date, window);
        self
    }

    /// Marks an extra interval busy, in place.
    pub fn hold(&mut self, staff_id: impl Into<String>, date: NaiveDate, window: TimeWindow) {
        self.held.push(HeldWindow {
            staff_id: staff_id.into(),
            date,
            window,
        });
    }

    /// The calendar this generator reads.
    pub fn calendar(&self) -> CalendarIndex<'a> {
        self.calendar
    }

    /// Busy intervals for the employee on `date`, merged and sorted.
    pub fn busy_windows(&self, employee_id: &str, date: NaiveDate) -> Vec<TimeWindow> {
        let mut busy = self.booked_windows(employee_id, date);
        busy.extend(self.calendar.time_off_windows(employee_id, date));
        busy.extend(self.held_windows(employee_id, date));
        merge_windows(&busy)
    }

    /// Free gaps inside the working window on `date`, ascending.
    pub fn free_windows(&self, employee_id: &str, date: NaiveDate) -> Vec<TimeWindow> {
        match self.calendar.working_window(employee_id, date) {
            Some(window) => window.subtract(&self.busy_windows(employee_id, date)),
            None => Vec::new(),
        }
    }

    /// Candidate start times for a block of `duration_minutes`.
    ///
    /// Ascending, no duplicates. Empty means no availability.
    pub fn available_slots(&self, employee_id: &str, date: NaiveDate, duration_minutes: u32) -> Vec<Slot> {
        let Some(window) = self.calendar.working_window(employee_id, date) else {
            return Vec::new();
        };
        if duration_minutes == 0 {
            log::debug!("zero-minute slot request for '{employee_id}' ignored");
            return Vec::new();
        }
        let elapsed_until = match self.elapsed(date) {
            Elapsed::Whole => return Vec::new(),
            Elapsed::Until(minute) => Some(minute),
            Elapsed::Nothing => None,
        };

        let duration = i64::from(duration_minutes);
        let step = i64::from(self.config.granularity_minutes.max(1));
        let mut slots = Vec::new();

        for gap in window.subtract(&self.busy_windows(employee_id, date)) {
            if gap.duration_min() < duration {
                continue;
            }
            // First grid point at or after the gap start.
            let offset = gap.start_min - window.start_min;
            let mut start = window.start_min + (offset + step - 1) / step * step;
            while start + duration <= gap.end_min {
                if elapsed_until.map_or(true, |cutoff| start > cutoff) {
                    if let Some(slot) = Slot::from_minutes(start) {
                        slots.push(slot);
                    }
                }
                start += step;
            }
        }

        log::debug!(
            "{} slot(s) of {}m for '{}' on {}",
            slots.len(),
            duration_minutes,
            employee_id,
            date
        );
        slots
    }

    /// Why `window` on `date` cannot be booked for the employee, if it can't.
    ///
    /// Checks working window containment, time off, the appointment
    /// snapshot, and held intervals, in that order.
    pub fn interval_conflict(
        &self,
        employee_id: &str,
        date: NaiveDate,
        window: TimeWindow,
    ) -> Option<ConflictReason> {
        match self.calendar.working_window(employee_id, date) {
            Some(working) if working.covers(&window) => {}
            _ => return Some(ConflictReason::NotWorking),
        }
        if self
            .calendar
            .time_off_windows(employee_id, date)
            .iter()
            .any(|w| w.overlaps(&window))
        {
            return Some(ConflictReason::TimeOff);
        }
        if self
            .booked_windows(employee_id, date)
            .iter()
            .any(|w| w.overlaps(&window))
        {
            return Some(ConflictReason::AlreadyBooked);
        }
        if self
            .held_windows(employee_id, date)
            .any(|w| w.overlaps(&window))
        {
            return Some(ConflictReason::DoubleBooked);
        }
        None
    }

    /// Why `start` could not be offered on `date`, ignoring bookings.
    ///
    /// A start is stale once it is at or before the cutoff (see
    /// [`available_slots`](Self::available_slots)) and off-grid when it is
    /// not a whole number of granularity steps after the working window
    /// opens. With no working window only the cutoff is checked;
    /// [`interval_conflict`](Self::interval_conflict) reports the rest.
    pub fn start_issue(&self, employee_id: &str, date: NaiveDate, start: Slot) -> Option<ConflictReason> {
        match self.elapsed(date) {
            Elapsed::Whole => return Some(ConflictReason::Elapsed),
            Elapsed::Until(cutoff) if start.minutes() <= cutoff => return Some(ConflictReason::Elapsed),
            _ => {}
        }
        let window = self.calendar.working_window(employee_id, date)?;
        let step = i64::from(self.config.granularity_minutes.max(1));
        ((start.minutes() - window.start_min).rem_euclid(step) != 0).then_some(ConflictReason::OffGrid)
    }

    /// Whether `window` on `date` is bookable for the employee.
    pub fn is_interval_free(&self, employee_id: &str, date: NaiveDate, window: TimeWindow) -> bool {
        self.interval_conflict(employee_id, date, window).is_none()
    }

    fn booked_windows(&self, employee_id: &str, date: NaiveDate) -> Vec<TimeWindow> {
        self.appointments
            .iter()
            .filter(|a| a.staff_id == employee_id && a.blocks_time())
            .filter_map(|a| a.window_on(date))
            .collect()
    }

    fn held_windows<'s>(
        &'s self,
        employee_id: &'s str,
        date: NaiveDate,
    ) -> impl Iterator<Item = TimeWindow> + 's {
        self.held
            .iter()
            .filter(move |h| h.staff_id == employee_id && h.date == date)
            .map(|h| h.window)
    }

    fn elapsed(&self, date: NaiveDate) -> Elapsed {
        let Some(now) = self.now else {
            return Elapsed::Nothing;
        };
        if date < now.date() {
            Elapsed::Whole
        } else if date == now.date() {
            Elapsed::Until(minute_of_day(now.time()) + i64::from(self.config.min_lead_minutes))
        } else {
            Elapsed::Nothing
        }
    }
}
