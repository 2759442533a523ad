//! The booking wizard session.
//!
//! [`BookingWizard`] owns one [`BookingDraft`] and the current step. It
//! borrows the catalog and the appointment store for the lifetime of the
//! session and never reads global state. Steps are rebuilt from the draft
//! on every transition, so editing an earlier answer can add or remove
//! later steps.
//!
//! # Flow
//!
//! ```text
//! client -> services -> date -> [assignment-mode] -> staff-time -> notes -> review
//! ```
//!
//! `next()` moves forward only when the current step's guard holds.
//! `back()` always moves one step back. `confirm()` on `review` plans the
//! appointments, re-validates them against the store, and inserts them as
//! one batch.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;

use super::assign::{auto_assign, StaffOption};
use super::commit::{find_conflicts, find_stale_starts, plan_appointments, BookingConfirmation};
use super::draft::{AssignmentMode, BookingDraft};
use super::steps::{build_steps, StepDescriptor, WizardStep};
use crate::availability::SlotGenerator;
use crate::catalog::Catalog;
use crate::config::SchedulingConfig;
use crate::error::{BookingError, Result};
use crate::models::{Appointment, Employee, TimeWindow};
use crate::qualification::{employees_for_all_services, employees_for_service};
use crate::store::AppointmentStore;

type Clock<'a> = Box<dyn Fn() -> NaiveDateTime + 'a>;

/// One wizard session over a catalog and an appointment store.
pub struct BookingWizard<'a, S: AppointmentStore + ?Sized> {
    catalog: &'a Catalog,
    store: &'a S,
    config: SchedulingConfig,
    clock: Clock<'a>,
    draft: BookingDraft,
    current: WizardStep,
}

impl<'a, S: AppointmentStore + ?Sized> BookingWizard<'a, S> {
    /// Opens a session with an empty draft.
    ///
    /// The catalog is validated first. Structural problems are fatal;
    /// uncovered services are logged and tolerated (they simply have no
    /// qualified staff).
    pub fn open(catalog: &'a Catalog, store: &'a S) -> Result<Self> {
        if let Err(errors) = catalog.validate() {
            let (warnings, fatal): (Vec<_>, Vec<_>) =
                errors.into_iter().partition(|e| e.kind.is_recoverable());
            for warning in &warnings {
                log::warn!("{}", warning);
            }
            if !fatal.is_empty() {
                return Err(BookingError::InvalidReferenceData(fatal));
            }
        }

        let draft = BookingDraft::new();
        let current = first_step(&draft);
        Ok(Self {
            catalog,
            store,
            config: SchedulingConfig::default(),
            clock: Box::new(|| chrono::Local::now().naive_local()),
            draft,
            current,
        })
    }

    /// Replaces the scheduling settings.
    pub fn with_config(mut self, config: SchedulingConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Replaces the clock used for the same-day cutoff.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Starts from a prepared draft, on its first step.
    pub fn with_draft(mut self, draft: BookingDraft) -> Self {
        self.current = first_step(&draft);
        self.draft = draft;
        self
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// The active steps for the current draft.
    pub fn steps(&self) -> Vec<StepDescriptor> {
        build_steps(&self.draft)
    }

    /// Applies an edit to the draft.
    ///
    /// If the edit removes the current step from the sequence, the wizard
    /// falls back to the nearest earlier step that still exists.
    pub fn update(&mut self, edit: impl FnOnce(BookingDraft) -> BookingDraft) {
        self.draft = edit(std::mem::take(&mut self.draft));

        let steps = self.steps();
        if !steps.iter().any(|s| s.step == self.current) {
            let fallback = steps
                .iter()
                .rev()
                .find(|s| s.step < self.current)
                .or_else(|| steps.first())
                .map_or(WizardStep::Services, |s| s.step);
            log::debug!("step '{}' left the sequence, now on '{}'", self.current, fallback);
            self.current = fallback;
        }
    }

    /// Whether the current step's guard holds.
    pub fn can_proceed(&self) -> bool {
        self.steps()
            .iter()
            .find(|s| s.step == self.current)
            .is_some_and(|s| s.check(&self.draft, self.catalog))
    }

    /// Moves to the following step.
    ///
    /// Leaving `date` with an unresolved mode and nobody able to perform
    /// the whole cart switches the draft to multi-staff mode.
    pub fn next(&mut self) -> Result<WizardStep> {
        if self.current == WizardStep::Date
            && self.draft.cart().len() > 1
            && self.draft.mode() == AssignmentMode::Auto
            && self.recommended_mode() == AssignmentMode::Multiple
        {
            log::debug!("no employee covers the whole cart, switching to multiple staff");
            self.update(|d| d.with_mode(AssignmentMode::Multiple));
        }

        let steps = self.steps();
        let index = self.position(&steps);
        let descriptor = steps[index];

        if !descriptor.check(&self.draft, self.catalog) {
            return Err(BookingError::StepBlocked {
                step: self.current,
                reason: self.blocked_reason(descriptor.step),
            });
        }
        let Some(following) = steps.get(index + 1) else {
            return Err(BookingError::StepBlocked {
                step: self.current,
                reason: "last step, confirm the booking instead".into(),
            });
        };

        log::debug!("wizard step '{}' -> '{}'", self.current, following.step);
        self.current = following.step;
        Ok(self.current)
    }

    /// Moves to the previous step. Stays put on the first step.
    pub fn back(&mut self) -> WizardStep {
        let steps = self.steps();
        let index = self.position(&steps);
        if index > 0 {
            log::debug!("wizard step '{}' -> '{}'", self.current, steps[index - 1].step);
            self.current = steps[index - 1].step;
        }
        self.current
    }

    /// Closes the session, discarding the draft.
    pub fn cancel(self) {
        log::debug!("booking draft discarded at '{}'", self.current);
    }

    /// Active employees who can perform every service in the cart.
    pub fn qualified_staff(&self) -> Vec<&'a Employee> {
        let catalog = self.catalog;
        employees_for_all_services(&catalog.employees, self.draft.cart(), &catalog.relationships)
    }

    /// `Single` when one employee can take the whole cart, else `Multiple`.
    pub fn recommended_mode(&self) -> AssignmentMode {
        if self.draft.cart().len() <= 1 || !self.qualified_staff().is_empty() {
            AssignmentMode::Single
        } else {
            AssignmentMode::Multiple
        }
    }

    /// Qualified employees working the draft date, with their back-to-back starts.
    ///
    /// Empty until a date and at least one service are chosen.
    pub fn single_staff_options(&self) -> Result<Vec<StaffOption>> {
        let Some(date) = self.draft.date() else {
            return Ok(Vec::new());
        };
        let cart = self.draft.cart();
        if cart.is_empty() {
            return Ok(Vec::new());
        }
        self.catalog.ensure_cart_known(cart)?;

        let calendar = self.catalog.calendar();
        let candidates: Vec<&Employee> = self
            .qualified_staff()
            .into_iter()
            .filter(|e| calendar.is_working(&e.id, date))
            .collect();
        let appointments = self.load_appointments(candidates.iter().map(|e| e.id.as_str()), date)?;
        let generator = self.generator(&appointments);

        Ok(candidates
            .into_iter()
            .map(|e| StaffOption {
                employee_id: e.id.clone(),
                employee_name: e.name.clone(),
                slots: generator.sequential_slots(&e.id, date, cart),
            })
            .collect())
    }

    /// Candidates and free starts for the cart item at `index`.
    ///
    /// Times already picked for the draft's other services count as busy
    /// for the staff member they were assigned to.
    pub fn assignment_options(&self, index: usize) -> Result<Vec<StaffOption>> {
        let (Some(date), Some(item)) = (self.draft.date(), self.draft.cart().get(index)) else {
            return Ok(Vec::new());
        };
        self.catalog.service(&item.service_id)?;

        let calendar = self.catalog.calendar();
        let candidates: Vec<&Employee> =
            employees_for_service(&self.catalog.employees, &item.service_id, &self.catalog.relationships)
                .into_iter()
                .filter(|e| calendar.is_working(&e.id, date))
                .collect();
        let appointments = self.load_appointments(candidates.iter().map(|e| e.id.as_str()), date)?;

        let mut generator = self.generator(&appointments);
        for (other, assignment) in self.draft.cart().iter().zip(self.draft.assignments()) {
            if other.service_id == item.service_id {
                continue;
            }
            if let (Some(staff_id), Some(start)) = (&assignment.staff_id, assignment.start) {
                let window = TimeWindow::new(
                    start.minutes(),
                    start.minutes() + i64::from(other.duration_minutes),
                );
                generator.hold(staff_id.clone(), date, window);
            }
        }

        Ok(candidates
            .into_iter()
            .map(|e| StaffOption {
                employee_id: e.id.clone(),
                employee_name: e.name.clone(),
                slots: generator.available_slots(&e.id, date, item.duration_minutes),
            })
            .collect())
    }

    /// Fills every assignment greedily and switches the draft to multi-staff.
    ///
    /// Returns how many cart items received staff and a time.
    pub fn auto_assign(&mut self) -> Result<usize> {
        let Some(date) = self.draft.date() else {
            return Err(BookingError::IncompleteDraft {
                step: WizardStep::Date,
                reason: "no date selected".into(),
            });
        };
        let cart = self.draft.cart();
        self.catalog.ensure_cart_known(cart)?;

        let staff: BTreeSet<&str> = cart
            .iter()
            .flat_map(|item| {
                employees_for_service(&self.catalog.employees, &item.service_id, &self.catalog.relationships)
            })
            .map(|e| e.id.as_str())
            .collect();
        let appointments = self.load_appointments(staff, date)?;
        let assignments = auto_assign(cart, date, self.catalog, &self.generator(&appointments));
        let assigned = assignments.iter().filter(|a| a.is_complete()).count();

        self.update(|d| d.with_mode(AssignmentMode::Multiple).with_assignments(assignments));
        Ok(assigned)
    }

    /// Books the draft.
    ///
    /// Only available on `review` with every step's guard satisfied. Chosen
    /// starts must still be offerable at the clock's current time, and every
    /// interval must still be free. On success the draft is discarded and
    /// the wizard starts over. On a conflict nothing is written and the
    /// wizard stays on `review`.
    pub fn confirm(&mut self) -> Result<BookingConfirmation> {
        if self.current != WizardStep::Review {
            return Err(BookingError::StepBlocked {
                step: self.current,
                reason: "bookings can only be confirmed from review".into(),
            });
        }
        if let Some(unmet) = self
            .steps()
            .into_iter()
            .find(|s| !s.check(&self.draft, self.catalog))
        {
            return Err(BookingError::IncompleteDraft {
                step: unmet.step,
                reason: self.blocked_reason(unmet.step),
            });
        }
        let Some(date) = self.draft.date() else {
            return Err(BookingError::IncompleteDraft {
                step: WizardStep::Date,
                reason: "no date selected".into(),
            });
        };

        let group_id = uuid::Uuid::new_v4().to_string();
        let planned = plan_appointments(&self.draft, self.catalog, &group_id)?;

        let mut conflicts = find_stale_starts(&self.draft, &planned, self.catalog, &self.config, (self.clock)());
        conflicts.extend(find_conflicts(&planned, date, self.catalog, self.store, &self.config)?);
        if !conflicts.is_empty() {
            log::warn!(
                "booking {} no longer fits: {} conflict(s)",
                group_id,
                conflicts.len()
            );
            return Err(BookingError::SlotConflict(conflicts));
        }
        self.store.insert_batch(&planned)?;

        log::info!(
            "booked {} appointment(s) in group {} on {}",
            planned.len(),
            group_id,
            date
        );
        self.draft = BookingDraft::new();
        self.current = first_step(&self.draft);
        Ok(BookingConfirmation {
            booking_group_id: group_id,
            appointments: planned,
        })
    }

    /// Returns to `staff-time` after a conflict, clearing chosen start times.
    pub fn return_to_slot_selection(&mut self) -> WizardStep {
        self.update(BookingDraft::without_start_times);
        self.current = WizardStep::StaffTime;
        self.current
    }

    fn position(&self, steps: &[StepDescriptor]) -> usize {
        steps.iter().position(|s| s.step == self.current).unwrap_or(0)
    }

    fn generator<'g>(&'g self, appointments: &'g [Appointment]) -> SlotGenerator<'g> {
        SlotGenerator::new(self.catalog.calendar(), appointments)
            .with_config(self.config.clone())
            .with_now((self.clock)())
    }

    fn load_appointments<'s>(
        &self,
        staff: impl IntoIterator<Item = &'s str>,
        date: chrono::NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let mut appointments = Vec::new();
        for staff_id in staff {
            appointments.extend(self.store.appointments_for(staff_id, date)?);
        }
        Ok(appointments)
    }

    fn blocked_reason(&self, step: WizardStep) -> String {
        match step {
            WizardStep::Client => "no client selected",
            WizardStep::Services => "cart is empty",
            WizardStep::Date => "no date selected",
            WizardStep::AssignmentMode if self.draft.mode() == AssignmentMode::Single => {
                "no employee can perform every service"
            }
            WizardStep::AssignmentMode => "choose single or multiple staff",
            WizardStep::StaffTime => "staff and start time required for every service",
            WizardStep::Notes | WizardStep::Review => "step incomplete",
        }
        .to_string()
    }
}

fn first_step(draft: &BookingDraft) -> WizardStep {
    build_steps(draft)
        .first()
        .map_or(WizardStep::Services, |s| s.step)
}
