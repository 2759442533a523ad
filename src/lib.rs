//! Appointment availability engine for staff-based services.
//!
//! Answers "who can do this, and when" for salon/clinic-style bookings and
//! drives a multi-step booking wizard from an empty draft to persisted
//! appointments.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Service`, `Specialization`, `Employee`,
//!   `WorkingHoursEntry`, `TimeOffEntry`, `Appointment`, `Slot`, `TimeWindow`
//! - **`catalog`**: Read-only reference data with fail-fast lookups
//! - **`availability`**: Calendar index, slot generator, sequential slots
//! - **`qualification`**: Which employees can perform which services
//! - **`booking`**: Immutable draft, wizard steps, commit, auto-assignment
//! - **`store`**: Appointment persistence boundary and an in-memory store
//! - **`config`**: Slot granularity and same-day lead time
//! - **`validation`**: Reference-data integrity checks
//!
//! # Architecture
//!
//! Every availability query is a pure function of the snapshot it is given
//! (reference data, appointments, the current time). The only stateful
//! piece is [`BookingWizard`], which owns one draft and borrows the catalog
//! and store. The store is the last line of defence against concurrent
//! double booking; the wizard re-validates right before writing so that
//! stale selections fail as a whole.
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime, Weekday};
//! use rust_decimal::Decimal;
//! use staff_booking::models::{Employee, Service, ServiceRelationships, Specialization, WorkingHoursEntry};
//! use staff_booking::{BookingDraft, BookingWizard, Catalog, ClientRef, InMemoryAppointmentStore, WizardStep};
//!
//! let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
//! let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
//! let catalog = Catalog::new()
//!     .with_service(Service::new("cut", "Haircut", 30, Decimal::from(25)))
//!     .with_specialization(Specialization::new("barber", "Barber"))
//!     .with_relationships(ServiceRelationships::new().with_mapping("barber", ["cut"]))
//!     .with_employee(Employee::new("E1", "Sam").with_specialization("barber"))
//!     .with_working_hours(WorkingHoursEntry::weekly("E1", Weekday::Mon, t(9), t(17)));
//! let store = InMemoryAppointmentStore::new();
//!
//! let mut wizard = BookingWizard::open(&catalog, &store)?
//!     .with_clock(move || monday.and_time(t(8)))
//!     .with_draft(BookingDraft::for_client(ClientRef::new("C1", "Robin")));
//! let cut = catalog.cart_item("cut")?;
//! wizard.update(|d| d.with_service(cut));
//! wizard.next()?;
//! wizard.update(|d| d.with_date(monday));
//! wizard.next()?;
//!
//! let options = wizard.single_staff_options()?;
//! let first = options[0].slots[0];
//! wizard.update(|d| d.with_single_staff("E1").with_single_start(first));
//! wizard.next()?;
//! wizard.next()?;
//! assert_eq!(wizard.current_step(), WizardStep::Review);
//!
//! let booked = wizard.confirm()?;
//! assert_eq!(booked.appointments[0].start, monday.and_time(t(9)));
//! # Ok::<(), staff_booking::BookingError>(())
//! ```

pub mod availability;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod qualification;
pub mod store;
pub mod validation;

pub use availability::{CalendarIndex, SlotGenerator};
pub use booking::{
    AssignmentMode, BookingConfirmation, BookingDraft, BookingWizard, ClientRef,
    ServiceAssignment, StaffOption, WizardStep,
};
pub use catalog::Catalog;
pub use config::SchedulingConfig;
pub use error::{BookingError, Conflict, ConflictReason, Result};
pub use store::{AppointmentStore, InMemoryAppointmentStore};
