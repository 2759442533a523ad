//! Appointment model.
//!
//! An appointment books one staff member for one service during a
//! half-open interval [start, end). Appointments created together from one
//! confirmed booking share a booking-group id.
//!
//! # Invariant
//! For a given staff id, no two appointments whose status is not
//! `Cancelled` may have overlapping intervals.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::calendar::{minutes_since, TimeWindow, MINUTES_PER_DAY};

/// A booked appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: String,
    /// Staff member performing the service.
    pub staff_id: String,
    /// Service being performed.
    pub service_id: String,
    /// Client the appointment is for.
    pub client_id: Option<String>,
    /// Start (inclusive).
    pub start: NaiveDateTime,
    /// End (exclusive) = start + service duration.
    pub end: NaiveDateTime,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Links appointments created together in one booking.
    pub booking_group_id: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    /// Scheduled, client not yet arrived.
    #[default]
    Booked,
    /// Client has arrived.
    CheckedIn,
    /// Service under way.
    InProgress,
    /// Service finished.
    Completed,
    /// Client did not turn up. Still holds the time.
    NoShow,
    /// Called off. The only status that frees the time.
    Cancelled,
}

/// Payment state of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// Nothing paid.
    #[default]
    Unpaid,
    /// Part paid in advance.
    Deposit,
    /// Paid in full.
    Paid,
    /// Money returned.
    Refunded,
}

impl Appointment {
    /// Creates a booked, unpaid appointment lasting `duration_minutes`.
    pub fn new(
        id: impl Into<String>,
        staff_id: impl Into<String>,
        service_id: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            staff_id: staff_id.into(),
            service_id: service_id.into(),
            client_id: None,
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
            status: AppointmentStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            booking_group_id: None,
            notes: None,
        }
    }

    /// Sets the client.
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the payment status.
    pub fn with_payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }

    /// Sets the booking group.
    pub fn with_booking_group(mut self, group_id: impl Into<String>) -> Self {
        self.booking_group_id = Some(group_id.into());
        self
    }

    /// Sets notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Whether this appointment occupies staff time.
    #[inline]
    pub fn blocks_time(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    /// Calendar date the appointment starts on.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Total duration (minutes).
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// The part of this appointment that falls on `date`, in minutes.
    pub fn window_on(&self, date: NaiveDate) -> Option<TimeWindow> {
        let raw = TimeWindow::new(minutes_since(date, self.start), minutes_since(date, self.end));
        raw.intersect(&TimeWindow::new(0, MINUTES_PER_DAY))
    }

    /// Whether two time-blocking appointments for the same staff collide.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.staff_id == other.staff_id
            && self.blocks_time()
            && other.blocks_time()
            && self.start < other.end
            && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn test_appointment_builder() {
        let a = Appointment::new("A1", "E1", "haircut", at(10, 0), 30)
            .with_client("C1")
            .with_booking_group("G1")
            .with_payment_status(PaymentStatus::Deposit)
            .with_notes("prefers scissors");

        assert_eq!(a.end, at(10, 30));
        assert_eq!(a.duration_minutes(), 30);
        assert_eq!(a.status, AppointmentStatus::Booked);
        assert_eq!(a.client_id.as_deref(), Some("C1"));
        assert_eq!(a.booking_group_id.as_deref(), Some("G1"));
        assert!(a.blocks_time());
    }

    #[test]
    fn test_window_on_date() {
        let a = Appointment::new("A1", "E1", "haircut", at(10, 0), 30);
        assert_eq!(a.window_on(a.date()), Some(TimeWindow::new(600, 630)));
        let next_day = a.date().succ_opt().unwrap();
        assert_eq!(a.window_on(next_day), None);
    }

    #[test]
    fn test_conflicts() {
        let a = Appointment::new("A1", "E1", "haircut", at(10, 0), 30);
        let overlapping = Appointment::new("A2", "E1", "beard", at(10, 15), 15);
        let touching = Appointment::new("A3", "E1", "beard", at(10, 30), 15);
        let other_staff = Appointment::new("A4", "E2", "beard", at(10, 0), 15);
        let cancelled = overlapping.clone().with_status(AppointmentStatus::Cancelled);

        assert!(a.conflicts_with(&overlapping));
        assert!(!a.conflicts_with(&touching));
        assert!(!a.conflicts_with(&other_staff));
        assert!(!a.conflicts_with(&cancelled));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&AppointmentStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checked-in\"");
        let back: AppointmentStatus = serde_json::from_str("\"no-show\"").unwrap();
        assert_eq!(back, AppointmentStatus::NoShow);
    }
}
