//! Reference-data validation.
//!
//! Checks the structural integrity of a [`Catalog`] before it is used for
//! booking. Detects:
//! - Duplicate IDs
//! - Services with zero duration or a negative price
//! - Dangling specialization, service, and employee references
//! - Working windows that are empty or cross midnight
//! - Time off that ends before it starts
//! - Services no specialization covers

use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;

use crate::catalog::Catalog;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A service takes zero minutes.
    InvalidDuration,
    /// A service has a negative price.
    NegativePrice,
    /// A specialization id doesn't exist.
    InvalidSpecializationReference,
    /// A service id doesn't exist.
    InvalidServiceReference,
    /// An employee id doesn't exist.
    InvalidEmployeeReference,
    /// Working hours with `open >= close`.
    InvalidWorkingWindow,
    /// Time off with `end <= start`.
    InvalidTimeOff,
    /// No specialization covers the service, so nobody can be booked for it.
    UncoveredService,
}

impl ValidationErrorKind {
    /// Whether booking can still proceed with this problem present.
    ///
    /// An uncovered service simply yields no qualified staff.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UncoveredService)
    }
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a reference-data catalog.
///
/// Checks:
/// 1. No duplicate service, specialization, or employee IDs
/// 2. Every service has a positive duration and a non-negative price
/// 3. Relationships reference existing specializations and services
/// 4. Employees reference existing specializations
/// 5. Working hours and time off reference existing employees
/// 6. Working windows satisfy `open < close` on one date
/// 7. Time off satisfies `start < end`
/// 8. Every service is covered by at least one specialization
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    let service_ids = collect_ids(
        catalog.services.iter().map(|s| s.id.as_str()),
        "service",
        &mut errors,
    );
    let specialization_ids = collect_ids(
        catalog.specializations.iter().map(|s| s.id.as_str()),
        "specialization",
        &mut errors,
    );
    let employee_ids = collect_ids(
        catalog.employees.iter().map(|e| e.id.as_str()),
        "employee",
        &mut errors,
    );

    for service in &catalog.services {
        if service.duration_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Service '{}' has zero duration", service.id),
            ));
        }
        if service.price < Decimal::ZERO {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativePrice,
                format!("Service '{}' has negative price {}", service.id, service.price),
            ));
        }
    }

    // Check relationship references
    for (spec_id, services) in catalog.relationships.iter() {
        if !specialization_ids.contains(spec_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSpecializationReference,
                format!("Relationship references unknown specialization '{spec_id}'"),
            ));
        }
        for service_id in services {
            if !service_ids.contains(service_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidServiceReference,
                    format!(
                        "Specialization '{spec_id}' references unknown service '{service_id}'"
                    ),
                ));
            }
        }
    }

    for employee in &catalog.employees {
        for spec_id in &employee.specializations {
            if !specialization_ids.contains(spec_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSpecializationReference,
                    format!(
                        "Employee '{}' references unknown specialization '{}'",
                        employee.id, spec_id
                    ),
                ));
            }
        }
    }

    for entry in &catalog.working_hours {
        if !employee_ids.contains(entry.employee_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidEmployeeReference,
                format!("Working hours reference unknown employee '{}'", entry.employee_id),
            ));
        }
        if entry.open >= entry.close {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWorkingWindow,
                format!(
                    "Working hours for '{}' open at {} but close at {}",
                    entry.employee_id, entry.open, entry.close
                ),
            ));
        }
    }

    for entry in &catalog.time_off {
        if !employee_ids.contains(entry.employee_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidEmployeeReference,
                format!("Time off references unknown employee '{}'", entry.employee_id),
            ));
        }
        if entry.end <= entry.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeOff,
                format!(
                    "Time off for '{}' ends at {} before it starts at {}",
                    entry.employee_id, entry.end, entry.start
                ),
            ));
        }
    }

    for service in &catalog.services {
        if !catalog.relationships.is_covered(&service.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UncoveredService,
                format!("Service '{}' is not covered by any specialization", service.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Employee, Service, ServiceRelationships, Specialization, TimeOffEntry, WorkingHoursEntry,
    };
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use rust_decimal_macros::dec;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample_catalog() -> Catalog {
        Catalog::new()
            .with_service(Service::new("haircut", "Haircut", 30, dec!(25)))
            .with_service(Service::new("beard", "Beard", 15, dec!(12)))
            .with_specialization(Specialization::new("barber", "Barber"))
            .with_relationships(
                ServiceRelationships::new().with_mapping("barber", ["haircut", "beard"]),
            )
            .with_employee(Employee::new("E1", "Sam").with_specialization("barber"))
            .with_working_hours(WorkingHoursEntry::weekly("E1", Weekday::Mon, t(9, 0), t(17, 0)))
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_catalog() {
        assert!(validate_catalog(&sample_catalog()).is_ok());
    }

    #[test]
    fn test_duplicate_service_id() {
        let c = sample_catalog().with_service(Service::new("haircut", "Again", 30, dec!(1)));
        let errors = validate_catalog(&c).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("service")));
    }

    #[test]
    fn test_zero_duration_and_negative_price() {
        let c = sample_catalog().with_service(Service::new("bad", "Bad", 0, dec!(-1)));
        let k = kinds(validate_catalog(&c));
        assert!(k.contains(&ValidationErrorKind::InvalidDuration));
        assert!(k.contains(&ValidationErrorKind::NegativePrice));
        assert!(k.contains(&ValidationErrorKind::UncoveredService));
    }

    #[test]
    fn test_dangling_references() {
        let c = sample_catalog()
            .with_relationships(
                ServiceRelationships::new()
                    .with_mapping("barber", ["haircut", "beard", "ghost"])
                    .with_mapping("wizard", ["haircut"]),
            )
            .with_employee(Employee::new("E2", "Kai").with_specialization("nails"))
            .with_working_hours(WorkingHoursEntry::weekly("E9", Weekday::Tue, t(9, 0), t(12, 0)));

        let k = kinds(validate_catalog(&c));
        assert!(k.contains(&ValidationErrorKind::InvalidServiceReference));
        assert!(k.contains(&ValidationErrorKind::InvalidSpecializationReference));
        assert!(k.contains(&ValidationErrorKind::InvalidEmployeeReference));
    }

    #[test]
    fn test_inverted_windows() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let c = sample_catalog()
            .with_working_hours(WorkingHoursEntry::on_date("E1", day, t(22, 0), t(2, 0)))
            .with_time_off(TimeOffEntry::new("E1", day.and_time(t(12, 0)), day.and_time(t(11, 0))));

        let k = kinds(validate_catalog(&c));
        assert!(k.contains(&ValidationErrorKind::InvalidWorkingWindow));
        assert!(k.contains(&ValidationErrorKind::InvalidTimeOff));
    }

    #[test]
    fn test_uncovered_service_is_recoverable() {
        let c = sample_catalog().with_service(Service::new("massage", "Massage", 60, dec!(80)));
        let errors = validate_catalog(&c).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UncoveredService);
        assert!(errors[0].kind.is_recoverable());
        assert!(!ValidationErrorKind::DuplicateId.is_recoverable());
    }

    #[test]
    fn test_multiple_errors() {
        let c = Catalog::new()
            .with_service(Service::new("a", "A", 0, dec!(1)))
            .with_service(Service::new("a", "A", 10, dec!(1)));
        let errors = validate_catalog(&c).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
