//! Candidate start time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::calendar::{minute_of_day, MINUTES_PER_DAY};

const SLOT_FORMAT: &str = "%H:%M";

/// A start time on a booking date, at minute resolution.
///
/// Displays and serializes as `"HH:MM"`; ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot(NaiveTime);

impl Slot {
    /// Slot at `hour:minute`. `None` if out of range.
    pub fn hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Slot at `minutes` past midnight. `None` outside `[0, 1440)`.
    pub fn from_minutes(minutes: i64) -> Option<Self> {
        if !(0..MINUTES_PER_DAY).contains(&minutes) {
            return None;
        }
        let minutes = u32::try_from(minutes).ok()?;
        Self::hm(minutes / 60, minutes % 60)
    }

    /// Minutes past midnight.
    #[inline]
    pub fn minutes(&self) -> i64 {
        minute_of_day(self.0)
    }

    /// Wall-clock time.
    #[inline]
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// This slot on `date`.
    #[inline]
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl From<NaiveTime> for Slot {
    /// Truncates seconds.
    fn from(time: NaiveTime) -> Self {
        let minutes = minute_of_day(time);
        Self::from_minutes(minutes).unwrap_or(Self(time))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SLOT_FORMAT))
    }
}

impl FromStr for Slot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, SLOT_FORMAT).map(Self)
    }
}

impl TryFrom<String> for Slot {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_format_and_parse() {
        let s = Slot::hm(9, 5).unwrap();
        assert_eq!(s.to_string(), "09:05");
        assert_eq!("09:05".parse::<Slot>().unwrap(), s);
        assert!("9h05".parse::<Slot>().is_err());
        assert!(Slot::hm(24, 0).is_none());
    }

    #[test]
    fn test_slot_minutes() {
        let s = Slot::from_minutes(630).unwrap();
        assert_eq!(s.to_string(), "10:30");
        assert_eq!(s.minutes(), 630);
        assert!(Slot::from_minutes(-1).is_none());
        assert!(Slot::from_minutes(1440).is_none());
    }

    #[test]
    fn test_slot_ordering() {
        let mut slots = vec![Slot::hm(10, 0).unwrap(), Slot::hm(9, 45).unwrap()];
        slots.sort();
        assert_eq!(slots[0].to_string(), "09:45");
    }

    #[test]
    fn test_slot_serde() {
        let s = Slot::hm(16, 30).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"16:30\"");
        let back: Slot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_slot_from_time_truncates_seconds() {
        let t = NaiveTime::from_hms_opt(9, 15, 42).unwrap();
        assert_eq!(Slot::from(t).to_string(), "09:15");
    }
}
