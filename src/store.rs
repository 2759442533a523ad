//! Appointment persistence boundary.
//!
//! The engine only needs two operations from storage: fetch a staff
//! member's appointments for a date, and insert a batch all-or-nothing.
//! The store is the final guard of the no-overlap invariant under
//! concurrent writers; the engine's own checks only keep obviously
//! invalid batches from being attempted.

use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard};

use crate::error::{BookingError, Conflict, ConflictReason, Result};
use crate::models::Appointment;

/// Read/write source of appointment records.
pub trait AppointmentStore {
    /// Appointments (any status) for `staff_id` that start on `date`.
    fn appointments_for(&self, staff_id: &str, date: NaiveDate) -> Result<Vec<Appointment>>;

    /// Inserts every appointment or none.
    ///
    /// Fails with [`BookingError::SlotConflict`] if any non-cancelled
    /// appointment would overlap another for the same staff member.
    fn insert_batch(&self, batch: &[Appointment]) -> Result<()>;
}

/// Thread-safe in-memory store.
///
/// Conflict checking and insertion happen under one lock, so concurrent
/// sessions cannot both win the same interval.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with existing appointments (unchecked).
    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: Mutex::new(appointments),
        }
    }

    /// Copy of every stored appointment.
    pub fn snapshot(&self) -> Result<Vec<Appointment>> {
        Ok(self.lock()?.clone())
    }

    /// Number of stored appointments.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Appointment>>> {
        self.appointments
            .lock()
            .map_err(|_| BookingError::Store("appointment lock poisoned".into()))
    }
}

impl AppointmentStore for InMemoryAppointmentStore {
    fn appointments_for(&self, staff_id: &str, date: NaiveDate) -> Result<Vec<Appointment>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|a| a.staff_id == staff_id && a.date() == date)
            .cloned()
            .collect())
    }

    fn insert_batch(&self, batch: &[Appointment]) -> Result<()> {
        let mut stored = self.lock()?;

        let mut conflicts = Vec::new();
        for (i, candidate) in batch.iter().enumerate() {
            let reason = if stored.iter().any(|a| a.conflicts_with(candidate)) {
                Some(ConflictReason::AlreadyBooked)
            } else if batch[..i].iter().any(|a| a.conflicts_with(candidate)) {
                Some(ConflictReason::DoubleBooked)
            } else {
                None
            };
            if let Some(reason) = reason {
                conflicts.push(Conflict {
                    staff_id: candidate.staff_id.clone(),
                    service_id: candidate.service_id.clone(),
                    start: candidate.start,
                    end: candidate.end,
                    reason,
                });
            }
        }

        if !conflicts.is_empty() {
            log::warn!("rejected batch of {} appointment(s): {} conflict(s)", batch.len(), conflicts.len());
            return Err(BookingError::SlotConflict(conflicts));
        }

        stored.extend_from_slice(batch);
        Ok(())
    }
}
