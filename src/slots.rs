//! Expansion of the day table into per-period slots and their timestamps.
//!
//! The expander lazily yields one `(date, period)` label per settlement
//! period, in date order. The timestamper then lays contiguous 30-minute
//! UTC increments over the label stream, starting from the range's first
//! midnight. The positional enumeration lines up with the labels because
//! each day contributes exactly as many labels as its civil day holds
//! half-hours: 46, 48 or 50.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};

use crate::calendar::TransitionDays;
use crate::model::{CalendarDay, SettlementSlot};

/// A half-hour slot label before time assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLabel {
    pub date: NaiveDate,
    pub period: u32,
}

/// Expand the day table into one label per settlement period, numbered
/// from 1 up to each day's period count.
pub fn expand(days: &[CalendarDay]) -> impl Iterator<Item = SlotLabel> + '_ {
    days.iter().flat_map(|day| {
        (1..=day.period_count).map(move |period| SlotLabel {
            date: day.date,
            period,
        })
    })
}

/// Assign each label its UTC instant and local-time representation.
///
/// The nth label (0-indexed) gets `start` 00:00 UTC plus n half-hours. The
/// day category emitted here is re-derived from the slot's *local* calendar
/// date rather than copied from the day table, which classified by UTC
/// date; during the summer months period 01 of each settlement date falls
/// on the previous UTC day.
pub fn timestamp<'a>(
    labels: impl Iterator<Item = SlotLabel> + 'a,
    start: NaiveDate,
    tz: Tz,
    transitions: &'a TransitionDays,
) -> impl Iterator<Item = SettlementSlot> + 'a {
    let origin = Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN));
    labels.enumerate().map(move |(n, label)| {
        let utc = origin + Duration::minutes(30 * n as i64);
        let local = utc.with_timezone(&tz);
        SettlementSlot {
            settlement_date: label.date,
            settlement_period: label.period,
            utc,
            local,
            local_is_dst: !local.offset().dst_offset().is_zero(),
            day_category: transitions.category_for(local.date_naive()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{classify_days, transition_days};
    use crate::model::DayCategory;

    fn london() -> Tz {
        "Europe/London".parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slots_for(start: NaiveDate, end: NaiveDate) -> Vec<SettlementSlot> {
        let tz = london();
        let transitions = transition_days(start, end, tz);
        let days = classify_days(start, end, tz, &transitions);
        timestamp(expand(&days), start, tz, &transitions).collect()
    }

    // ── expansion ────────────────────────────────────────────

    #[test]
    fn expansion_length_is_sum_of_period_counts() {
        let start = date(2019, 1, 1);
        let end = date(2019, 12, 31);
        let transitions = transition_days(start, end, london());
        let days = classify_days(start, end, london(), &transitions);
        assert_eq!(expand(&days).count(), 365 * 48);
    }

    #[test]
    fn periods_are_contiguous_from_one_per_date() {
        let start = date(2019, 3, 30);
        let end = date(2019, 4, 1);
        let transitions = transition_days(start, end, london());
        let days = classify_days(start, end, london(), &transitions);
        let labels: Vec<SlotLabel> = expand(&days).collect();

        let mut expected = Vec::new();
        for (d, count) in [
            (date(2019, 3, 30), 48),
            (date(2019, 3, 31), 46),
            (date(2019, 4, 1), 48),
        ] {
            for p in 1..=count {
                expected.push(SlotLabel { date: d, period: p });
            }
        }
        assert_eq!(labels, expected);
    }

    #[test]
    fn expansion_is_restartable() {
        let start = date(2019, 1, 1);
        let end = date(2019, 1, 2);
        let transitions = transition_days(start, end, london());
        let days = classify_days(start, end, london(), &transitions);
        let first: Vec<SlotLabel> = expand(&days).collect();
        let second: Vec<SlotLabel> = expand(&days).collect();
        assert_eq!(first, second);
    }

    // ── timestamps ───────────────────────────────────────────

    #[test]
    fn first_slot_is_start_midnight_utc() {
        let slots = slots_for(date(2001, 1, 1), date(2001, 1, 2));
        assert_eq!(slots[0].settlement_period, 1);
        assert_eq!(slots[0].utc.to_rfc3339(), "2001-01-01T00:00:00+00:00");
        assert_eq!(slots[0].local.to_rfc3339(), "2001-01-01T00:00:00+00:00");
        assert!(!slots[0].local_is_dst);
    }

    #[test]
    fn consecutive_slots_are_thirty_minutes_apart() {
        // Spanning the spring-forward day keeps the UTC grid contiguous.
        let slots = slots_for(date(2019, 3, 30), date(2019, 4, 1));
        for pair in slots.windows(2) {
            assert_eq!(pair[1].utc - pair[0].utc, Duration::minutes(30));
        }
    }

    #[test]
    fn local_time_jumps_an_hour_on_the_short_day() {
        let slots = slots_for(date(2019, 1, 1), date(2019, 4, 30));
        let short: Vec<&SettlementSlot> = slots
            .iter()
            .filter(|s| s.settlement_date == date(2019, 3, 31))
            .collect();
        assert_eq!(short.len(), 46);
        // Period 2 ends at 01:00 UTC; period 3 starts at 02:00 local.
        assert_eq!(short[1].local.to_rfc3339(), "2019-03-31T00:30:00+00:00");
        assert_eq!(short[2].local.to_rfc3339(), "2019-03-31T02:00:00+01:00");
        assert!(!short[1].local_is_dst);
        assert!(short[2].local_is_dst);
        assert!(short.iter().all(|s| s.day_category == DayCategory::Short));
    }

    #[test]
    fn local_hour_repeats_on_the_long_day() {
        let slots = slots_for(date(2019, 1, 1), date(2019, 10, 31));
        let long: Vec<&SettlementSlot> = slots
            .iter()
            .filter(|s| s.settlement_date == date(2019, 10, 27))
            .collect();
        assert_eq!(long.len(), 50);
        // 01:00 local occurs twice, first in BST then in GMT.
        assert_eq!(long[2].local.to_rfc3339(), "2019-10-27T01:00:00+01:00");
        assert_eq!(long[4].local.to_rfc3339(), "2019-10-27T01:00:00+00:00");
        assert!(long[2].local_is_dst);
        assert!(!long[4].local_is_dst);
        assert!(long.iter().all(|s| s.day_category == DayCategory::Long));
    }

    #[test]
    fn summer_period_one_falls_on_previous_utc_day() {
        let slots = slots_for(date(2019, 1, 1), date(2019, 7, 2));
        let first = slots
            .iter()
            .find(|s| s.settlement_date == date(2019, 7, 1) && s.settlement_period == 1)
            .unwrap();
        assert_eq!(first.utc.to_rfc3339(), "2019-06-30T23:00:00+00:00");
        assert_eq!(first.local.to_rfc3339(), "2019-07-01T00:00:00+01:00");
        assert!(first.local_is_dst);
        // The local-date basis keeps the category aligned with the
        // settlement date even though the UTC date is a day behind.
        assert_eq!(first.day_category, DayCategory::Normal);
    }

    #[test]
    fn every_date_gets_its_full_period_count() {
        let slots = slots_for(date(2019, 1, 1), date(2019, 10, 29));
        let first = date(2019, 10, 25);
        let end = date(2019, 10, 29);
        let mut d = first;
        while d <= end {
            let per_date: Vec<u32> = slots
                .iter()
                .filter(|s| s.settlement_date == d)
                .map(|s| s.settlement_period)
                .collect();
            let expected_count = if d == date(2019, 10, 27) { 50 } else { 48 };
            assert_eq!(per_date, (1..=expected_count).collect::<Vec<u32>>());
            d = d + Duration::days(1);
        }
    }
}
