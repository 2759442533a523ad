//! Turning a finished draft into appointment records.
//!
//! Planning is pure. Re-validation reads the latest appointments for every
//! target staff member and checks each planned interval, including
//! against the other intervals of the same booking. The store performs the
//! final all-or-nothing insert.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::draft::{AssignmentMode, BookingDraft};
use super::steps::WizardStep;
use crate::availability::{sequential_segments, SlotGenerator};
use crate::catalog::Catalog;
use crate::config::SchedulingConfig;
use crate::error::{BookingError, Conflict, ConflictReason, Result};
use crate::models::{Appointment, ServiceCartItem, Slot};
use crate::store::AppointmentStore;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Result of a successful confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// Shared by every appointment created.
    pub booking_group_id: String,
    /// The persisted appointments, in cart order.
    pub appointments: Vec<Appointment>,
}

fn incomplete(step: WizardStep, reason: impl Into<String>) -> BookingError {
    BookingError::IncompleteDraft {
        step,
        reason: reason.into(),
    }
}

/// Builds the appointments a draft would create.
///
/// Single mode derives back-to-back segments from one start; multiple mode
/// uses each assignment's own staff and start. Every appointment carries
/// `group_id`, the client, and the notes.
pub fn plan_appointments(draft: &BookingDraft, catalog: &Catalog, group_id: &str) -> Result<Vec<Appointment>> {
    if draft.cart().is_empty() {
        return Err(incomplete(WizardStep::Services, "cart is empty"));
    }
    catalog.ensure_cart_known(draft.cart())?;
    let cart = current_cart(draft.cart(), catalog)?;
    let date = draft
        .date()
        .ok_or_else(|| incomplete(WizardStep::Date, "no date selected"))?;

    let planned: Vec<(String, String, NaiveDateTime, u32)> = match draft.effective_mode() {
        AssignmentMode::Multiple => cart
            .iter()
            .map(|item| {
                let assigned = draft
                    .assignment(&item.service_id)
                    .and_then(|a| a.staff_id.as_deref().zip(a.start));
                let Some((staff_id, start)) = assigned else {
                    return Err(incomplete(
                        WizardStep::StaffTime,
                        format!("service '{}' has no staff or time", item.service_id),
                    ));
                };
                catalog.employee(staff_id)?;
                Ok((staff_id.to_string(), item.service_id.clone(), start.on(date), item.duration_minutes))
            })
            .collect::<Result<_>>()?,
        AssignmentMode::Single | AssignmentMode::Auto => {
            let staff_id = draft
                .single_staff_id()
                .ok_or_else(|| incomplete(WizardStep::StaffTime, "no staff selected"))?;
            catalog.employee(staff_id)?;
            let start = draft
                .single_start()
                .ok_or_else(|| incomplete(WizardStep::StaffTime, "no start time selected"))?;
            sequential_segments(date, start, &cart)
                .into_iter()
                .zip(&cart)
                .map(|(segment, item)| {
                    (staff_id.to_string(), segment.service_id, segment.start, item.duration_minutes)
                })
                .collect()
        }
    };

    Ok(planned
        .into_iter()
        .map(|(staff_id, service_id, start, minutes)| {
            let mut appointment = Appointment::new(
                uuid::Uuid::new_v4().to_string(),
                staff_id,
                service_id,
                start,
                minutes,
            )
            .with_booking_group(group_id);
            if let Some(client) = draft.client() {
                appointment = appointment.with_client(client.id.clone());
            }
            if !draft.notes().trim().is_empty() {
                appointment = appointment.with_notes(draft.notes());
            }
            appointment
        })
        .collect())
}

/// Cart items re-read from the catalog, so durations are the catalog's.
///
/// A zero-minute service cannot be booked and fails as bad reference data.
fn current_cart(cart: &[ServiceCartItem], catalog: &Catalog) -> Result<Vec<ServiceCartItem>> {
    cart.iter()
        .map(|item| {
            let current = catalog.cart_item(&item.service_id)?;
            if current.duration_minutes == 0 {
                return Err(BookingError::InvalidReferenceData(vec![ValidationError::new(
                    ValidationErrorKind::InvalidDuration,
                    format!("Service '{}' has zero duration", item.service_id),
                )]));
            }
            Ok(current)
        })
        .collect()
}

/// Checks planned appointments against the store's current data.
///
/// Returns every conflict found; empty means the batch is still bookable.
pub fn find_conflicts<S: AppointmentStore + ?Sized>(
    planned: &[Appointment],
    date: NaiveDate,
    catalog: &Catalog,
    store: &S,
    config: &SchedulingConfig,
) -> Result<Vec<Conflict>> {
    let staff: BTreeSet<&str> = planned.iter().map(|a| a.staff_id.as_str()).collect();
    let mut latest = Vec::new();
    for staff_id in staff {
        latest.extend(store.appointments_for(staff_id, date)?);
    }

    let mut generator = SlotGenerator::new(catalog.calendar(), &latest).with_config(config.clone());
    let mut conflicts = Vec::new();
    for appointment in planned {
        let window = appointment
            .window_on(date)
            .filter(|w| w.duration_min() == appointment.duration_minutes());
        let Some(window) = window else {
            // Empty, or spilling past the booking date.
            conflicts.push(conflict(appointment, ConflictReason::NotWorking));
            continue;
        };
        if let Some(reason) = generator.interval_conflict(&appointment.staff_id, date, window) {
            conflicts.push(conflict(appointment, reason));
        }
        generator.hold(appointment.staff_id.clone(), date, window);
    }
    Ok(conflicts)
}

/// Checks the chosen start times against what would be offered at `now`.
///
/// In single mode only the block start was chosen; the later segments
/// follow from it. In multiple mode every assignment start is checked.
/// Reports [`ConflictReason::Elapsed`] and [`ConflictReason::OffGrid`].
pub fn find_stale_starts(
    draft: &BookingDraft,
    planned: &[Appointment],
    catalog: &Catalog,
    config: &SchedulingConfig,
    now: NaiveDateTime,
) -> Vec<Conflict> {
    let chosen = match draft.effective_mode() {
        AssignmentMode::Multiple => planned,
        AssignmentMode::Single | AssignmentMode::Auto => &planned[..planned.len().min(1)],
    };
    let generator = SlotGenerator::new(catalog.calendar(), &[])
        .with_config(config.clone())
        .with_now(now);

    chosen
        .iter()
        .filter_map(|appointment| {
            let date = appointment.date();
            let start = Slot::from(appointment.start.time());
            generator
                .start_issue(&appointment.staff_id, date, start)
                .map(|reason| conflict(appointment, reason))
        })
        .collect()
}

fn conflict(appointment: &Appointment, reason: ConflictReason) -> Conflict {
    Conflict {
        staff_id: appointment.staff_id.clone(),
        service_id: appointment.service_id.clone(),
        start: appointment.start,
        end: appointment.end,
        reason,
    }
}
