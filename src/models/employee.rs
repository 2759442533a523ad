//! Employee model.
//!
//! Employees are the staff who perform services. Each holds a set of
//! specializations and an employment status; only active employees take
//! part in scheduling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A staff member who can be booked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Specialization ids held by this employee.
    pub specializations: Vec<String>,
    /// Job role (stylist, receptionist, manager, ...).
    pub role: String,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

/// Employment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmployeeStatus {
    /// Bookable.
    #[default]
    Active,
    /// Temporarily away; not offered.
    OnLeave,
    /// No longer working; not offered.
    Inactive,
}

impl Employee {
    /// Creates an active employee with no specializations.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: EmployeeStatus::Active,
            specializations: Vec::new(),
            role: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a specialization.
    pub fn with_specialization(mut self, specialization_id: impl Into<String>) -> Self {
        self.specializations.push(specialization_id.into());
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether this employee takes part in scheduling.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}
