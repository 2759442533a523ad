//! Which staff can perform which services.
//!
//! An employee qualifies for a service when at least one of their
//! specializations covers it. Only active employees qualify. Results keep
//! the input order; ranking is left to callers.

use crate::models::{Employee, ServiceCartItem, ServiceRelationships};

/// Whether `employee` is active and holds a specialization covering `service_id`.
pub fn qualifies(employee: &Employee, service_id: &str, relationships: &ServiceRelationships) -> bool {
    employee.is_active()
        && employee
            .specializations
            .iter()
            .any(|spec| relationships.covers(spec, service_id))
}

/// Every active employee qualified for `service_id`, in input order.
pub fn employees_for_service<'a>(
    employees: &'a [Employee],
    service_id: &str,
    relationships: &ServiceRelationships,
) -> Vec<&'a Employee> {
    employees
        .iter()
        .filter(|e| qualifies(e, service_id, relationships))
        .collect()
}

/// Every active employee qualified for all services in `cart`, in input order.
///
/// Intersection, not union: covering two of three services is not enough.
/// An empty cart places no constraint and returns every active employee.
/// An empty result is a signal to switch to multi-staff assignment.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use staff_booking::models::{Employee, Service, ServiceCartItem, ServiceRelationships};
/// use staff_booking::qualification::employees_for_all_services;
///
/// let rel = ServiceRelationships::new()
///     .with_mapping("barber", ["cut", "beard"])
///     .with_mapping("colorist", ["color"]);
/// let staff = vec![
///     Employee::new("E1", "Sam").with_specialization("barber"),
///     Employee::new("E2", "Kai").with_specialization("barber").with_specialization("colorist"),
/// ];
/// let cart: Vec<ServiceCartItem> = ["cut", "color"]
///     .iter()
///     .map(|id| ServiceCartItem::from(&Service::new(*id, *id, 30, Decimal::ONE)))
///     .collect();
///
/// let both = employees_for_all_services(&staff, &cart, &rel);
/// assert_eq!(both.len(), 1);
/// assert_eq!(both[0].id, "E2");
/// ```
pub fn employees_for_all_services<'a>(
    employees: &'a [Employee],
    cart: &[ServiceCartItem],
    relationships: &ServiceRelationships,
) -> Vec<&'a Employee> {
    employees
        .iter()
        .filter(|e| e.is_active())
        .filter(|e| {
            cart.iter()
                .all(|item| qualifies(e, &item.service_id, relationships))
        })
        .collect()
}
