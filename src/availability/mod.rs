//! Availability: when staff work, when they are free, and where a
//! requested block of work can start.
//!
//! # Components
//!
//! - [`CalendarIndex`]: working window and time off per (employee, date)
//! - [`SlotGenerator`]: free gaps and grid-aligned start times for one
//!   employee and a duration, plus interval checks
//! - [`sequential_segments`] / [`SlotGenerator::sequential_slots`]: a
//!   whole cart performed back-to-back by one employee
//!
//! Every query reads a snapshot passed in by the caller; nothing is cached
//! between calls.

mod calendar_index;
mod sequential;
mod slots;

pub use calendar_index::CalendarIndex;
pub use sequential::{sequential_segments, ServiceSegment};
pub use slots::{HeldWindow, SlotGenerator};
