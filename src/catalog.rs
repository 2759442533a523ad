//! Read-only reference data.
//!
//! The [`Catalog`] bundles everything the engine reads but never writes:
//! services, specializations and their coverage table, staff, working
//! hours, and time off. Lookups by id fail fast: an id that does not
//! resolve is a broken precondition, not an empty result.

use serde::{Deserialize, Serialize};

use crate::availability::CalendarIndex;
use crate::error::{BookingError, Result};
use crate::models::{
    Employee, Service, ServiceCartItem, ServiceRelationships, Specialization, TimeOffEntry,
    WorkingHoursEntry,
};
use crate::validation::{validate_catalog, ValidationResult};

/// Snapshot of reference data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Bookable services.
    pub services: Vec<Service>,
    /// Skill categories.
    pub specializations: Vec<Specialization>,
    /// Which specializations cover which services.
    pub relationships: ServiceRelationships,
    /// Staff, in display order.
    pub employees: Vec<Employee>,
    /// Weekly and date-specific hours.
    pub working_hours: Vec<WorkingHoursEntry>,
    /// Absences.
    pub time_off: Vec<TimeOffEntry>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service.
    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Adds a specialization.
    pub fn with_specialization(mut self, specialization: Specialization) -> Self {
        self.specializations.push(specialization);
        self
    }

    /// Replaces the coverage table.
    pub fn with_relationships(mut self, relationships: ServiceRelationships) -> Self {
        self.relationships = relationships;
        self
    }

    /// Adds an employee.
    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.push(employee);
        self
    }

    /// Adds a working-hours entry.
    pub fn with_working_hours(mut self, entry: WorkingHoursEntry) -> Self {
        self.working_hours.push(entry);
        self
    }

    /// Adds a time-off entry.
    pub fn with_time_off(mut self, entry: TimeOffEntry) -> Self {
        self.time_off.push(entry);
        self
    }

    /// Looks up a service.
    pub fn service(&self, service_id: &str) -> Result<&Service> {
        self.services
            .iter()
            .find(|s| s.id == service_id)
            .ok_or_else(|| BookingError::UnknownService(service_id.to_string()))
    }

    /// Looks up an employee.
    pub fn employee(&self, employee_id: &str) -> Result<&Employee> {
        self.employees
            .iter()
            .find(|e| e.id == employee_id)
            .ok_or_else(|| BookingError::UnknownEmployee(employee_id.to_string()))
    }

    /// Builds a cart item from a service id.
    pub fn cart_item(&self, service_id: &str) -> Result<ServiceCartItem> {
        self.service(service_id).map(ServiceCartItem::from)
    }

    /// Checks that every cart item refers to a known service.
    pub fn ensure_cart_known(&self, cart: &[ServiceCartItem]) -> Result<()> {
        for item in cart {
            if let Err(e) = self.service(&item.service_id) {
                log::warn!("cart references unknown service '{}'", item.service_id);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Working-hours and time-off view used by availability queries.
    pub fn calendar(&self) -> CalendarIndex<'_> {
        CalendarIndex::new(&self.working_hours, &self.time_off)
    }

    /// Structural checks over the whole catalog.
    pub fn validate(&self) -> ValidationResult {
        validate_catalog(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeStatus;
    use rust_decimal_macros::dec;

    fn sample() -> Catalog {
        Catalog::new()
            .with_service(Service::new("haircut", "Haircut", 30, dec!(25)))
            .with_service(Service::new("beard", "Beard Trim", 15, dec!(12)))
            .with_specialization(Specialization::new("barber", "Barber"))
            .with_relationships(
                ServiceRelationships::new().with_mapping("barber", ["haircut", "beard"]),
            )
            .with_employee(Employee::new("E1", "Sam").with_specialization("barber"))
            .with_employee(
                Employee::new("E2", "Kai")
                    .with_specialization("barber")
                    .with_status(EmployeeStatus::Inactive),
            )
    }

    #[test]
    fn test_lookups() {
        let c = sample();
        assert_eq!(c.service("beard").unwrap().duration_minutes, 15);
        assert!(matches!(c.service("massage"), Err(BookingError::UnknownService(id)) if id == "massage"));
        assert_eq!(c.employee("E2").unwrap().name, "Kai");
        assert!(matches!(c.employee("E9"), Err(BookingError::UnknownEmployee(_))));
    }

    #[test]
    fn test_cart_item() {
        let c = sample();
        let item = c.cart_item("haircut").unwrap();
        assert_eq!(item.name, "Haircut");
        assert_eq!(item.price, dec!(25));
        assert!(c.cart_item("massage").is_err());
    }

    #[test]
    fn test_ensure_cart_known_fails_fast() {
        let c = sample();
        let mut cart = vec![c.cart_item("haircut").unwrap()];
        assert!(c.ensure_cart_known(&cart).is_ok());

        cart.push(ServiceCartItem {
            service_id: "ghost".into(),
            name: "Ghost".into(),
            duration_minutes: 10,
            price: dec!(1),
        });
        assert!(matches!(c.ensure_cart_known(&cart), Err(BookingError::UnknownService(_))));
    }
}
