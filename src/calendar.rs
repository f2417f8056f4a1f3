//! Calendar classification for the configured date range.
//!
//! Walks every UTC midnight in range and asks the timezone database whether
//! that instant observes daylight saving in the civil zone. A day-over-day
//! change in that flag marks the two irregular days of the year: the short
//! day on which clocks go forward (46 periods) and the long day on which
//! they go back (50 periods). All other days carry 48 periods.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use std::collections::BTreeSet;

use crate::model::{CalendarDay, DayCategory, DstTransition};

/// The short and long days found in the scanned range.
#[derive(Debug, Default)]
pub struct TransitionDays {
    short_days: BTreeSet<NaiveDate>,
    long_days: BTreeSet<NaiveDate>,
}

impl TransitionDays {
    /// Day category by set membership. The date basis is the caller's
    /// choice: the per-day table passes UTC calendar dates, the slot
    /// timestamper passes each slot's local calendar date. A date is never
    /// in both sets; spring-forward and fall-back alternate within a year.
    pub fn category_for(&self, date: NaiveDate) -> DayCategory {
        if self.short_days.contains(&date) {
            DayCategory::Short
        } else if self.long_days.contains(&date) {
            DayCategory::Long
        } else {
            DayCategory::Normal
        }
    }
}

fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// True if the civil zone observes daylight saving at this date's 00:00 UTC.
pub fn is_dst_at_utc_midnight(date: NaiveDate, tz: Tz) -> bool {
    !utc_midnight(date)
        .with_timezone(&tz)
        .offset()
        .dst_offset()
        .is_zero()
}

/// Collect the short and long days between `start` and `end` inclusive.
///
/// A transition surfaces in the *following* midnight's offset, so the date
/// at which the change is detected is shifted back one calendar day to name
/// the day the clocks actually moved. The scan runs one midnight past `end`
/// so that a transition on the final day of the range is still attributed.
pub fn transition_days(start: NaiveDate, end: NaiveDate, tz: Tz) -> TransitionDays {
    let mut found = TransitionDays::default();
    let mut prev_dst = is_dst_at_utc_midnight(start, tz);
    let stop = end + Duration::days(1);
    let mut date = start + Duration::days(1);
    while date <= stop {
        let dst = is_dst_at_utc_midnight(date, tz);
        if dst != prev_dst {
            let flagged = date - Duration::days(1);
            if dst {
                found.short_days.insert(flagged);
            } else {
                found.long_days.insert(flagged);
            }
        }
        prev_dst = dst;
        date = date + Duration::days(1);
    }
    found
}

/// Build the per-day table for the inclusive range: one `CalendarDay` per
/// UTC calendar day, carrying the DST flag, the transition marker and the
/// settlement-period count.
pub fn classify_days(
    start: NaiveDate,
    end: NaiveDate,
    tz: Tz,
    transitions: &TransitionDays,
) -> Vec<CalendarDay> {
    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        let category = transitions.category_for(date);
        let transition = match category {
            DayCategory::Normal => DstTransition::None,
            DayCategory::Short => DstTransition::SpringForward,
            DayCategory::Long => DstTransition::FallBack,
        };
        days.push(CalendarDay {
            date,
            is_dst_local: is_dst_at_utc_midnight(date, tz),
            transition,
            period_count: category.period_count(),
        });
        date = date + Duration::days(1);
    }
    days
}
