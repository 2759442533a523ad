//! Service and specialization models.
//!
//! A service is a unit of bookable work with a fixed duration and price.
//! Specializations are qualification tags held by staff; the
//! [`ServiceRelationships`] table says which services each one covers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A bookable service. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    /// Unique service identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Time the service takes (minutes, > 0).
    pub duration_minutes: u32,
    /// Price (non-negative).
    pub price: Decimal,
    /// Grouping shown in menus.
    pub category: Option<String>,
    /// Longer description for display.
    pub description: Option<String>,
}

impl Service {
    /// Creates a new service.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration_minutes: u32,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_minutes,
            price,
            category: None,
            description: None,
        }
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named skill category staff can hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Specialization {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Specialization {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One-directional lookup: specialization id → service ids it covers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ServiceRelationships {
    map: BTreeMap<String, BTreeSet<String>>,
}

impl ServiceRelationships {
    /// Creates an empty relationship table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `specialization_id` covers every service in `service_ids`.
    pub fn with_mapping<I, S>(mut self, specialization_id: impl Into<String>, service_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map
            .entry(specialization_id.into())
            .or_default()
            .extend(service_ids.into_iter().map(Into::into));
        self
    }

    /// Whether `specialization_id` covers `service_id`.
    pub fn covers(&self, specialization_id: &str, service_id: &str) -> bool {
        self.map
            .get(specialization_id)
            .is_some_and(|services| services.contains(service_id))
    }

    /// Whether any specialization covers `service_id`.
    pub fn is_covered(&self, service_id: &str) -> bool {
        self.map.values().any(|s| s.contains(service_id))
    }

    /// Iterates `(specialization_id, service_ids)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A service placed in the in-progress booking cart.
///
/// Snapshot of the service's name, duration, and price at selection time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceCartItem {
    /// Catalog service id.
    pub service_id: String,
    /// Service name when selected.
    pub name: String,
    /// Duration (minutes) when selected.
    pub duration_minutes: u32,
    /// Price when selected.
    pub price: Decimal,
}

impl From<&Service> for ServiceCartItem {
    fn from(service: &Service) -> Self {
        Self {
            service_id: service.id.clone(),
            name: service.name.clone(),
            duration_minutes: service.duration_minutes,
            price: service.price,
        }
    }
}

/// Total minutes of a cart, in cart order.
pub fn cart_duration_minutes(cart: &[ServiceCartItem]) -> u32 {
    cart.iter().map(|item| item.duration_minutes).sum()
}

/// Total price of a cart.
pub fn cart_price(cart: &[ServiceCartItem]) -> Decimal {
    cart.iter().map(|item| item.price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_service_builder() {
        let s = Service::new("haircut", "Haircut", 30, dec!(25.00))
            .with_category("Hair")
            .with_description("Wash, cut, and style");

        assert_eq!(s.id, "haircut");
        assert_eq!(s.duration_minutes, 30);
        assert_eq!(s.price, dec!(25.00));
        assert_eq!(s.category.as_deref(), Some("Hair"));
    }

    #[test]
    fn test_relationships_lookup() {
        let rel = ServiceRelationships::new()
            .with_mapping("barber", ["haircut", "beard"])
            .with_mapping("colorist", ["color"])
            .with_mapping("barber", ["shave"]);

        assert!(rel.covers("barber", "haircut"));
        assert!(rel.covers("barber", "shave"));
        assert!(!rel.covers("barber", "color"));
        assert!(!rel.covers("unknown", "haircut"));
        assert!(rel.is_covered("color"));
        assert!(!rel.is_covered("massage"));
    }

    #[test]
    fn test_cart_totals() {
        let cart = vec![
            ServiceCartItem::from(&Service::new("haircut", "Haircut", 30, dec!(25.00))),
            ServiceCartItem::from(&Service::new("beard", "Beard Trim", 15, dec!(12.50))),
        ];
        assert_eq!(cart_duration_minutes(&cart), 45);
        assert_eq!(cart_price(&cart), dec!(37.50));
        assert_eq!(cart_duration_minutes(&[]), 0);
    }

    #[test]
    fn test_relationships_serde_shape() {
        let rel = ServiceRelationships::new().with_mapping("barber", ["haircut"]);
        let json = serde_json::to_string(&rel).unwrap();
        assert_eq!(json, r#"{"barber":["haircut"]}"#);
    }
}
