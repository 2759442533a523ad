//! Back-to-back multi-service blocks for one staff member.
//!
//! A cart [d1, d2, d3] booked at start `t` occupies one contiguous block
//! `[t, t + d1 + d2 + d3)`. Per-service boundaries are derived in cart
//! order: service 1 takes `[t, t + d1)`, service 2 `[t + d1, t + d1 + d2)`,
//! and so on. Reordering the cart changes which service lands where.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::SlotGenerator;
use crate::models::{cart_duration_minutes, ServiceCartItem, Slot};

/// The part of a sequential block taken by one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSegment {
    /// Service performed in this segment.
    pub service_id: String,
    /// Segment start.
    pub start: NaiveDateTime,
    /// Segment end (exclusive).
    pub end: NaiveDateTime,
}

impl ServiceSegment {
    /// Segment length (minutes).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Splits a block starting at `start` on `date` into per-service segments.
pub fn sequential_segments(date: NaiveDate, start: Slot, cart: &[ServiceCartItem]) -> Vec<ServiceSegment> {
    let mut cursor = start.on(date);
    cart.iter()
        .map(|item| {
            let end = cursor + Duration::minutes(i64::from(item.duration_minutes));
            let segment = ServiceSegment {
                service_id: item.service_id.clone(),
                start: cursor,
                end,
            };
            cursor = end;
            segment
        })
        .collect()
}

impl<'a> SlotGenerator<'a> {
    /// Starts where the whole cart fits back-to-back for one employee.
    ///
    /// Empty cart → empty result.
    pub fn sequential_slots(&self, employee_id: &str, date: NaiveDate, cart: &[ServiceCartItem]) -> Vec<Slot> {
        if cart.is_empty() {
            return Vec::new();
        }
        self.available_slots(employee_id, date, cart_duration_minutes(cart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::CalendarIndex;
    use crate::models::{Appointment, WorkingHoursEntry};
    use chrono::{NaiveTime, Weekday};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn item(id: &str, minutes: u32) -> ServiceCartItem {
        ServiceCartItem {
            service_id: id.into(),
            name: id.into(),
            duration_minutes: minutes,
            price: dec!(10),
        }
    }

    #[test]
    fn test_haircut_and_beard_skip_conflict() {
        let hours = vec![WorkingHoursEntry::weekly("E1", Weekday::Mon, t(9, 0), t(17, 0))];
        let booked = vec![Appointment::new("A1", "E1", "x", monday().and_time(t(9, 30)), 30)];
        let generator = SlotGenerator::new(CalendarIndex::new(&hours, &[]), &booked);
        let cart = vec![item("haircut", 30), item("beard", 15)];

        let slots = generator.sequential_slots("E1", monday(), &cart);
        let strings: Vec<String> = slots.iter().map(Slot::to_string).collect();
        assert_eq!(strings.first().map(String::as_str), Some("10:00"));
        assert!(!strings.contains(&"09:00".to_string()));
        assert!(!strings.contains(&"09:15".to_string()));
        assert_eq!(strings.last().map(String::as_str), Some("16:15"));
    }

    #[test]
    fn test_empty_cart() {
        let hours = vec![WorkingHoursEntry::weekly("E1", Weekday::Mon, t(9, 0), t(17, 0))];
        let generator = SlotGenerator::new(CalendarIndex::new(&hours, &[]), &[]);
        assert!(generator.sequential_slots("E1", monday(), &[]).is_empty());
    }

    #[test]
    fn test_segments_follow_cart_order() {
        let start = Slot::hm(10, 0).unwrap();
        let forward = sequential_segments(monday(), start, &[item("haircut", 30), item("beard", 15)]);
        assert_eq!(forward[0].service_id, "haircut");
        assert_eq!(forward[0].start, monday().and_time(t(10, 0)));
        assert_eq!(forward[1].start, monday().and_time(t(10, 30)));
        assert_eq!(forward[1].end, monday().and_time(t(10, 45)));

        let reversed = sequential_segments(monday(), start, &[item("beard", 15), item("haircut", 30)]);
        assert_eq!(reversed[0].service_id, "beard");
        assert_eq!(reversed[1].start, monday().and_time(t(10, 15)));
    }

    proptest! {
        #[test]
        fn prop_segments_partition_block(
            durations in proptest::collection::vec(1u32..120, 1..6),
            start_min in 0i64..600,
        ) {
            let cart: Vec<ServiceCartItem> = durations
                .iter()
                .enumerate()
                .map(|(i, d)| item(&format!("s{i}"), *d))
                .collect();
            let start = Slot::from_minutes(start_min).unwrap();
            let segments = sequential_segments(monday(), start, &cart);

            prop_assert_eq!(segments.len(), cart.len());
            prop_assert_eq!(segments[0].start, start.on(monday()));
            for pair in segments.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            let total: i64 = segments.iter().map(ServiceSegment::duration_minutes).sum();
            prop_assert_eq!(total, i64::from(cart_duration_minutes(&cart)));
            let last = segments.last().unwrap();
            prop_assert_eq!((last.end - segments[0].start).num_minutes(), total);
        }
    }
}
