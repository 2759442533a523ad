//! In-progress booking request.
//!
//! [`BookingDraft`] is an immutable value: every `with_*` call returns a
//! new draft. Updates that invalidate later answers clear them on the way
//! (a new date drops chosen start times, a changed cart re-syncs the
//! per-service assignments).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{cart_duration_minutes, cart_price, ServiceCartItem, Slot};

/// How the cart is split across staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    /// One employee performs every service back-to-back.
    Single,
    /// Each service gets its own employee and time.
    Multiple,
    /// Not chosen yet.
    #[default]
    Auto,
}

/// The client a booking is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    /// Client id.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl ClientRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Staff and start time for one cart item (multi-staff mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAssignment {
    /// Cart item this entry belongs to.
    pub service_id: String,
    /// Chosen employee, if any.
    pub staff_id: Option<String>,
    /// Chosen start, if any. Cleared when the employee changes.
    pub start: Option<Slot>,
}

impl ServiceAssignment {
    /// Unassigned entry for a service.
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            staff_id: None,
            start: None,
        }
    }

    /// Whether both staff and start are set.
    pub fn is_complete(&self) -> bool {
        self.staff_id.is_some() && self.start.is_some()
    }
}

/// The wizard's working copy of a booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    client: Option<ClientRef>,
    client_preset: bool,
    date: Option<NaiveDate>,
    mode: AssignmentMode,
    cart: Vec<ServiceCartItem>,
    single_staff_id: Option<String>,
    single_start: Option<Slot>,
    assignments: Vec<ServiceAssignment>,
    notes: String,
}

impl BookingDraft {
    /// Empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft opened for a known client; the client step is skipped.
    pub fn for_client(client: ClientRef) -> Self {
        Self {
            client: Some(client),
            client_preset: true,
            ..Self::default()
        }
    }

    pub fn client(&self) -> Option<&ClientRef> {
        self.client.as_ref()
    }

    /// Whether the client came with the draft rather than from the wizard.
    pub fn client_preset(&self) -> bool {
        self.client_preset
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Mode as chosen (may be `Auto`).
    pub fn mode(&self) -> AssignmentMode {
        self.mode
    }

    /// Mode that applies: a single-item cart is always single-staff.
    pub fn effective_mode(&self) -> AssignmentMode {
        if self.cart.len() <= 1 {
            AssignmentMode::Single
        } else {
            self.mode
        }
    }

    pub fn cart(&self) -> &[ServiceCartItem] {
        &self.cart
    }

    pub fn single_staff_id(&self) -> Option<&str> {
        self.single_staff_id.as_deref()
    }

    pub fn single_start(&self) -> Option<Slot> {
        self.single_start
    }

    /// One entry per cart item, in cart order.
    pub fn assignments(&self) -> &[ServiceAssignment] {
        &self.assignments
    }

    /// The assignment for a service, if it is in the cart.
    pub fn assignment(&self, service_id: &str) -> Option<&ServiceAssignment> {
        self.assignments.iter().find(|a| a.service_id == service_id)
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Sum of cart durations (minutes).
    pub fn total_duration_minutes(&self) -> u32 {
        cart_duration_minutes(&self.cart)
    }

    /// Sum of cart prices.
    pub fn total_price(&self) -> Decimal {
        cart_price(&self.cart)
    }

    /// Attaches a client.
    pub fn with_client(mut self, client: ClientRef) -> Self {
        self.client = Some(client);
        self
    }

    /// Detaches the client (a preset client stays).
    pub fn without_client(mut self) -> Self {
        if !self.client_preset {
            self.client = None;
        }
        self
    }

    /// Adds a service to the end of the cart. No-op if already present.
    pub fn with_service(mut self, item: ServiceCartItem) -> Self {
        if self.cart.iter().any(|c| c.service_id == item.service_id) {
            return self;
        }
        self.cart.push(item);
        self.cart_changed()
    }

    /// Removes a service from the cart.
    pub fn without_service(mut self, service_id: &str) -> Self {
        let before = self.cart.len();
        self.cart.retain(|c| c.service_id != service_id);
        if self.cart.len() == before {
            return self;
        }
        self.cart_changed()
    }

    /// Replaces the cart, keeping the first occurrence of each service.
    pub fn with_cart(mut self, items: Vec<ServiceCartItem>) -> Self {
        let mut cart: Vec<ServiceCartItem> = Vec::with_capacity(items.len());
        for item in items {
            if !cart.iter().any(|c| c.service_id == item.service_id) {
                cart.push(item);
            }
        }
        if cart == self.cart {
            return self;
        }
        self.cart = cart;
        self.cart_changed()
    }

    /// Sets the booking date. A different date clears chosen start times.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        if self.date != Some(date) {
            self.date = Some(date);
            self = self.without_start_times();
        }
        self
    }

    /// Sets the assignment mode.
    pub fn with_mode(mut self, mode: AssignmentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Picks the single-staff employee. A different employee clears the start.
    pub fn with_single_staff(mut self, staff_id: impl Into<String>) -> Self {
        let staff_id = staff_id.into();
        if self.single_staff_id.as_deref() != Some(staff_id.as_str()) {
            self.single_staff_id = Some(staff_id);
            self.single_start = None;
        }
        self
    }

    /// Picks the single-staff start time.
    pub fn with_single_start(mut self, start: Slot) -> Self {
        self.single_start = Some(start);
        self
    }

    /// Picks the employee for one service. A different employee clears its start.
    pub fn with_assignment_staff(mut self, service_id: &str, staff_id: impl Into<String>) -> Self {
        let staff_id = staff_id.into();
        if let Some(a) = self.assignments.iter_mut().find(|a| a.service_id == service_id) {
            if a.staff_id.as_deref() != Some(staff_id.as_str()) {
                a.staff_id = Some(staff_id);
                a.start = None;
            }
        }
        self
    }

    /// Picks the start time for one service.
    pub fn with_assignment_start(mut self, service_id: &str, start: Slot) -> Self {
        if let Some(a) = self.assignments.iter_mut().find(|a| a.service_id == service_id) {
            a.start = Some(start);
        }
        self
    }

    /// Replaces all assignments, matched to cart items by service id.
    pub fn with_assignments(mut self, assignments: Vec<ServiceAssignment>) -> Self {
        for a in self.assignments.iter_mut() {
            if let Some(new) = assignments.iter().find(|n| n.service_id == a.service_id) {
                a.staff_id = new.staff_id.clone();
                a.start = new.start;
            }
        }
        self
    }

    /// Clears every chosen start time, keeping staff picks.
    pub fn without_start_times(mut self) -> Self {
        self.single_start = None;
        for a in self.assignments.iter_mut() {
            a.start = None;
        }
        self
    }

    /// Sets free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Re-syncs assignments with the cart and drops the single-staff start.
    fn cart_changed(mut self) -> Self {
        let previous = std::mem::take(&mut self.assignments);
        self.assignments = self
            .cart
            .iter()
            .map(|item| {
                previous
                    .iter()
                    .find(|a| a.service_id == item.service_id)
                    .cloned()
                    .unwrap_or_else(|| ServiceAssignment::new(&item.service_id))
            })
            .collect();
        self.single_start = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: &str, minutes: u32, price: Decimal) -> ServiceCartItem {
        ServiceCartItem {
            service_id: id.into(),
            name: id.into(),
            duration_minutes: minutes,
            price,
        }
    }

    fn slot(h: u32, m: u32) -> Slot {
        Slot::hm(h, m).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_updates_return_new_values() {
        let original = BookingDraft::new();
        let updated = original.clone().with_notes("window seat");
        assert_eq!(original.notes(), "");
        assert_eq!(updated.notes(), "window seat");
    }

    #[test]
    fn test_cart_and_totals() {
        let d = BookingDraft::new()
            .with_service(item("haircut", 30, dec!(25)))
            .with_service(item("beard", 15, dec!(12.50)))
            .with_service(item("haircut", 30, dec!(25))); // duplicate ignored

        assert_eq!(d.cart().len(), 2);
        assert_eq!(d.total_duration_minutes(), 45);
        assert_eq!(d.total_price(), dec!(37.50));
        assert_eq!(d.assignments().len(), 2);
        assert_eq!(d.assignments()[1].service_id, "beard");
    }

    #[test]
    fn test_effective_mode() {
        let d = BookingDraft::new()
            .with_mode(AssignmentMode::Multiple)
            .with_service(item("haircut", 30, dec!(25)));
        assert_eq!(d.effective_mode(), AssignmentMode::Single);

        let d = d.with_service(item("beard", 15, dec!(12)));
        assert_eq!(d.effective_mode(), AssignmentMode::Multiple);
        assert_eq!(BookingDraft::new().mode(), AssignmentMode::Auto);
    }

    #[test]
    fn test_date_change_clears_starts() {
        let d = BookingDraft::new()
            .with_cart(vec![item("haircut", 30, dec!(25)), item("beard", 15, dec!(12))])
            .with_date(monday())
            .with_single_staff("E1")
            .with_single_start(slot(10, 0))
            .with_assignment_staff("beard", "E2")
            .with_assignment_start("beard", slot(11, 0));

        let same = d.clone().with_date(monday());
        assert_eq!(same.single_start(), Some(slot(10, 0)));

        let moved = d.with_date(monday().succ_opt().unwrap());
        assert_eq!(moved.single_start(), None);
        assert_eq!(moved.single_staff_id(), Some("E1"));
        assert_eq!(moved.assignment("beard").unwrap().start, None);
        assert_eq!(moved.assignment("beard").unwrap().staff_id.as_deref(), Some("E2"));
    }

    #[test]
    fn test_cart_change_keeps_retained_assignments() {
        let d = BookingDraft::new()
            .with_cart(vec![item("haircut", 30, dec!(25)), item("beard", 15, dec!(12))])
            .with_single_staff("E1")
            .with_single_start(slot(10, 0))
            .with_assignment_staff("haircut", "E1")
            .with_assignment_start("haircut", slot(9, 0));

        let d = d.without_service("beard");
        assert_eq!(d.assignments().len(), 1);
        assert!(d.assignment("haircut").unwrap().is_complete());
        assert_eq!(d.single_start(), None);

        // Removing something absent changes nothing.
        let same = d.clone().without_service("color");
        assert_eq!(same, d);
    }

    #[test]
    fn test_staff_change_clears_start() {
        let d = BookingDraft::new()
            .with_single_staff("E1")
            .with_single_start(slot(10, 0));
        assert_eq!(d.clone().with_single_staff("E1").single_start(), Some(slot(10, 0)));
        assert_eq!(d.with_single_staff("E2").single_start(), None);
    }

    #[test]
    fn test_preset_client_sticks() {
        let d = BookingDraft::for_client(ClientRef::new("C1", "Robin"));
        assert!(d.client_preset());
        assert!(d.clone().without_client().client().is_some());

        let picked = BookingDraft::new().with_client(ClientRef::new("C2", "Alex"));
        assert!(!picked.client_preset());
        assert!(picked.without_client().client().is_none());
    }

    #[test]
    fn test_with_assignments_matches_by_service() {
        let d = BookingDraft::new()
            .with_cart(vec![item("haircut", 30, dec!(25)), item("beard", 15, dec!(12))])
            .with_assignments(vec![ServiceAssignment {
                service_id: "beard".into(),
                staff_id: Some("E2".into()),
                start: Some(slot(9, 30)),
            }]);
        assert!(d.assignment("beard").unwrap().is_complete());
        assert!(!d.assignment("haircut").unwrap().is_complete());
        let cleared = d.without_start_times();
        assert!(cleared.assignments().iter().all(|a| a.start.is_none()));
    }
}
