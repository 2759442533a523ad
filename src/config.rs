//! Slot-generation settings.
//!
//! Both knobs are business policy rather than algorithm: the grid that
//! offered start times snap to, and how far ahead of "now" a same-day slot
//! must start.

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// Default slot grid (minutes).
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 15;

/// Settings shared by every slot query.
///
/// Missing fields fall back to their defaults when deserialized.
///
/// # Example
/// ```
/// use staff_booking::SchedulingConfig;
///
/// let config = SchedulingConfig::from_json_str(r#"{ "granularity_minutes": 30 }"#).unwrap();
/// assert_eq!(config.granularity_minutes, 30);
/// assert_eq!(config.min_lead_minutes, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Start times are offered every `granularity_minutes` from the
    /// working window's open time.
    pub granularity_minutes: u32,
    /// On the current date, a slot must start more than this many minutes
    /// after now.
    pub min_lead_minutes: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            min_lead_minutes: 0,
        }
    }
}

impl SchedulingConfig {
    /// Default settings (15-minute grid, no lead time).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the slot grid.
    pub fn with_granularity(mut self, minutes: u32) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    /// Sets the same-day lead time.
    pub fn with_min_lead(mut self, minutes: u32) -> Self {
        self.min_lead_minutes = minutes;
        self
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.granularity_minutes == 0 {
            return Err(BookingError::InvalidConfig(
                "granularity_minutes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BookingError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
