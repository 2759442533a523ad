//! Error types for the booking engine.
//!
//! "No qualified staff" and "no available slots" are not errors: they are
//! reported as empty lists. Everything here is either a precondition
//! violation (bad reference data, incomplete draft) or a lost race at
//! commit time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::booking::WizardStep;
use crate::validation::ValidationError;

/// Type alias for Result using the engine's error type.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Root error type for the booking engine.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("Invalid reference data: {}", summarize(.0))]
    InvalidReferenceData(Vec<ValidationError>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Booking draft is incomplete at step '{step}': {reason}")]
    IncompleteDraft { step: WizardStep, reason: String },

    #[error("Cannot leave step '{step}': {reason}")]
    StepBlocked { step: WizardStep, reason: String },

    #[error("Requested time is no longer available ({} conflict(s))", .0.len())]
    SlotConflict(Vec<Conflict>),

    #[error("Appointment store failed: {0}")]
    Store(String),
}

impl BookingError {
    /// Whether this is a commit-time conflict the user can recover from by
    /// picking another slot.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::SlotConflict(_))
    }

    /// The conflicts carried by a [`BookingError::SlotConflict`].
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            Self::SlotConflict(conflicts) => conflicts,
            _ => &[],
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// One interval that can no longer be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Staff member the interval was planned for.
    pub staff_id: String,
    /// Service the interval was planned for.
    pub service_id: String,
    /// Interval start.
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
    /// What blocks the interval.
    pub reason: ConflictReason,
}

/// Why an interval is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Outside the staff member's working window, or not working that day.
    NotWorking,
    /// Overlaps the staff member's time off.
    TimeOff,
    /// Overlaps an existing appointment.
    AlreadyBooked,
    /// Overlaps another appointment in the same booking.
    DoubleBooked,
    /// The start time has already passed (or falls inside the lead time).
    Elapsed,
    /// The start time is not on the slot grid.
    OffGrid,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::NotWorking => write!(f, "not working"),
            ConflictReason::TimeOff => write!(f, "time off"),
            ConflictReason::AlreadyBooked => write!(f, "already booked"),
            ConflictReason::DoubleBooked => write!(f, "double booked"),
            ConflictReason::Elapsed => write!(f, "start time has passed"),
            ConflictReason::OffGrid => write!(f, "start time is not on the slot grid"),
        }
    }
}
