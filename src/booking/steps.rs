//! Wizard steps as data.
//!
//! The step list is rebuilt from the draft on every transition. Each
//! descriptor carries the guard that must hold before the wizard may move
//! past it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::draft::{AssignmentMode, BookingDraft};
use crate::catalog::Catalog;
use crate::qualification::{employees_for_all_services, qualifies};

/// One page of the booking wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    /// Pick the client. Skipped when the draft starts with one.
    Client,
    /// Build the service cart.
    Services,
    /// Pick the booking date.
    Date,
    /// One employee or one per service. Only for carts of two or more.
    AssignmentMode,
    /// Pick staff and start times.
    StaffTime,
    /// Optional free-text notes.
    Notes,
    /// Summary and confirmation.
    Review,
}

impl WizardStep {
    /// Kebab-case step name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Client => "client",
            WizardStep::Services => "services",
            WizardStep::Date => "date",
            WizardStep::AssignmentMode => "assignment-mode",
            WizardStep::StaffTime => "staff-time",
            WizardStep::Notes => "notes",
            WizardStep::Review => "review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate deciding whether a step is complete.
pub type StepGuard = fn(&BookingDraft, &Catalog) -> bool;

/// A step together with its completion guard.
#[derive(Clone, Copy)]
pub struct StepDescriptor {
    /// Which step this is.
    pub step: WizardStep,
    /// Holds once the step's answer is complete.
    pub can_proceed: StepGuard,
}

impl StepDescriptor {
    fn new(step: WizardStep, can_proceed: StepGuard) -> Self {
        Self { step, can_proceed }
    }

    /// Evaluates the guard.
    pub fn check(&self, draft: &BookingDraft, catalog: &Catalog) -> bool {
        (self.can_proceed)(draft, catalog)
    }
}

impl fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor").field("step", &self.step).finish()
    }
}

/// The active steps for `draft`, in order.
///
/// - `client` only when the draft was not opened with a client
/// - `assignment-mode` only when the cart holds more than one service
pub fn build_steps(draft: &BookingDraft) -> Vec<StepDescriptor> {
    let mut steps = Vec::with_capacity(7);
    if !draft.client_preset() {
        steps.push(StepDescriptor::new(WizardStep::Client, client_chosen));
    }
    steps.push(StepDescriptor::new(WizardStep::Services, cart_filled));
    steps.push(StepDescriptor::new(WizardStep::Date, date_chosen));
    if draft.cart().len() > 1 {
        steps.push(StepDescriptor::new(WizardStep::AssignmentMode, mode_resolved));
    }
    steps.push(StepDescriptor::new(WizardStep::StaffTime, staff_and_time_chosen));
    steps.push(StepDescriptor::new(WizardStep::Notes, always));
    steps.push(StepDescriptor::new(WizardStep::Review, always));
    steps
}

fn client_chosen(draft: &BookingDraft, _: &Catalog) -> bool {
    draft.client().is_some()
}

fn cart_filled(draft: &BookingDraft, _: &Catalog) -> bool {
    !draft.cart().is_empty()
}

fn date_chosen(draft: &BookingDraft, _: &Catalog) -> bool {
    draft.date().is_some()
}

/// `Auto` must be resolved; `Single` needs someone who covers the whole cart.
fn mode_resolved(draft: &BookingDraft, catalog: &Catalog) -> bool {
    match draft.mode() {
        AssignmentMode::Auto => false,
        AssignmentMode::Multiple => true,
        AssignmentMode::Single => {
            !employees_for_all_services(&catalog.employees, draft.cart(), &catalog.relationships)
                .is_empty()
        }
    }
}

fn staff_and_time_chosen(draft: &BookingDraft, catalog: &Catalog) -> bool {
    match draft.effective_mode() {
        AssignmentMode::Multiple => draft.assignments().iter().all(|a| {
            a.start.is_some()
                && a.staff_id
                    .as_deref()
                    .and_then(|id| catalog.employee(id).ok())
                    .is_some_and(|e| qualifies(e, &a.service_id, &catalog.relationships))
        }),
        AssignmentMode::Single | AssignmentMode::Auto => {
            draft.single_start().is_some()
                && draft
                    .single_staff_id()
                    .and_then(|id| catalog.employee(id).ok())
                    .is_some_and(|e| {
                        draft
                            .cart()
                            .iter()
                            .all(|item| qualifies(e, &item.service_id, &catalog.relationships))
                    })
        }
    }
}

fn always(_: &BookingDraft, _: &Catalog) -> bool {
    true
}
