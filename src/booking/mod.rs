//! Booking draft orchestration.
//!
//! - [`BookingDraft`]: immutable in-progress request
//! - [`build_steps`]: the wizard's step list, rebuilt from the draft
//! - [`BookingWizard`]: step transitions, staff/slot options, confirmation
//! - [`auto_assign`]: greedy multi-staff assignment

mod assign;
mod commit;
mod draft;
mod steps;
mod wizard;

pub use assign::{auto_assign, StaffOption};
pub use commit::{find_conflicts, find_stale_starts, plan_appointments, BookingConfirmation};
pub use draft::{AssignmentMode, BookingDraft, ClientRef, ServiceAssignment};
pub use steps::{build_steps, StepDescriptor, StepGuard, WizardStep};
pub use wizard::BookingWizard;
