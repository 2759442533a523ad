//! Greedy staff assignment for multi-staff bookings.
//!
//! # Algorithm
//!
//! 1. Walk the cart in order.
//! 2. For each service, consider every active qualified employee who works
//!    that date.
//! 3. Pick the employee with the earliest available start (ties keep the
//!    catalog order).
//! 4. Hold the chosen interval so later services cannot reuse it.
//!
//! Not optimal, but fast and predictable: the same inputs always produce
//! the same assignment.
//!
//! # Complexity
//! O(n * c * s) where n = cart items, c = candidates, s = slot scan.

use chrono::NaiveDate;

use super::draft::ServiceAssignment;
use crate::availability::SlotGenerator;
use crate::catalog::Catalog;
use crate::models::{ServiceCartItem, Slot, TimeWindow};
use crate::qualification::employees_for_service;

/// One bookable option: an employee and their free starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffOption {
    /// Employee id.
    pub employee_id: String,
    /// Display name.
    pub employee_name: String,
    /// Bookable starts on the draft date, ascending.
    pub slots: Vec<Slot>,
}

/// Assigns each cart item to the earliest-available qualified employee.
///
/// Items with no option stay unassigned. `generator` should already hold
/// any intervals that must not be reused.
pub fn auto_assign(
    cart: &[ServiceCartItem],
    date: NaiveDate,
    catalog: &Catalog,
    generator: &SlotGenerator<'_>,
) -> Vec<ServiceAssignment> {
    let mut generator = generator.clone();
    let calendar = generator.calendar();
    let mut assignments = Vec::with_capacity(cart.len());

    for item in cart {
        let mut best: Option<(&str, Slot)> = None;

        for employee in employees_for_service(&catalog.employees, &item.service_id, &catalog.relationships) {
            if !calendar.is_working(&employee.id, date) {
                continue;
            }
            let Some(first) = generator
                .available_slots(&employee.id, date, item.duration_minutes)
                .into_iter()
                .next()
            else {
                continue;
            };
            if best.map_or(true, |(_, current)| first < current) {
                best = Some((employee.id.as_str(), first));
            }
        }

        let mut assignment = ServiceAssignment::new(&item.service_id);
        if let Some((staff_id, start)) = best {
            let window = TimeWindow::new(
                start.minutes(),
                start.minutes() + i64::from(item.duration_minutes),
            );
            generator.hold(staff_id, date, window);
            assignment.staff_id = Some(staff_id.to_string());
            assignment.start = Some(start);
            log::debug!("auto-assigned '{}' to '{}' at {}", item.service_id, staff_id, start);
        } else {
            log::debug!("no staff available for '{}' on {}", item.service_id, date);
        }
        assignments.push(assignment);
    }

    assignments
}
