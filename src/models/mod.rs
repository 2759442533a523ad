//! Booking domain models.
//!
//! Plain data types for the reference data the engine reads (services,
//! specializations, staff, working hours, time off) and the records it
//! writes (appointments).
//!
//! # Domain Mappings
//!
//! | staff-booking | Salon | Clinic | Studio |
//! |---------------|-------|--------|--------|
//! | Service | Haircut | Consultation | Session |
//! | Specialization | Barber | Cardiology | Portrait |
//! | Employee | Stylist | Doctor | Photographer |
//! | Appointment | Booking | Visit | Shoot |

mod appointment;
mod calendar;
mod employee;
mod service;
mod slot;

pub use appointment::{Appointment, AppointmentStatus, PaymentStatus};
pub use calendar::{
    merge_windows, minute_of_day, minutes_since, TimeOffEntry, TimeWindow, WorkingDay,
    WorkingHoursEntry, MINUTES_PER_DAY,
};
pub use employee::{Employee, EmployeeStatus};
pub use service::{
    cart_duration_minutes, cart_price, Service, ServiceCartItem, ServiceRelationships,
    Specialization,
};
pub use slot::Slot;
