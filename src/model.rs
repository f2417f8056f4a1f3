use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Classification of a civil day by its settlement-period count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCategory {
    Normal,
    Short,
    Long,
}

impl DayCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayCategory::Normal => "normal",
            DayCategory::Short => "short",
            DayCategory::Long => "long",
        }
    }

    /// Number of 30-minute settlement periods in a day of this kind:
    /// 48 for a 24-hour day, 46 when the clocks go forward, 50 when
    /// they go back.
    pub fn period_count(&self) -> u32 {
        match self {
            DayCategory::Normal => 48,
            DayCategory::Short => 46,
            DayCategory::Long => 50,
        }
    }

    pub fn is_short(&self) -> bool {
        matches!(self, DayCategory::Short)
    }

    pub fn is_long(&self) -> bool {
        matches!(self, DayCategory::Long)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, DayCategory::Normal)
    }
}

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Daylight-saving transition falling within a civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstTransition {
    None,
    /// Clocks move forward; the day loses an hour.
    SpringForward,
    /// Clocks move back; the day gains an hour.
    FallBack,
}

/// One UTC calendar day in the configured range, labelled with its
/// settlement-period count. Immutable once classified.
#[derive(Debug, Clone, Copy)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Whether the civil zone observes daylight saving at this date's
    /// 00:00 UTC.
    #[allow(dead_code)]
    pub is_dst_local: bool,
    pub transition: DstTransition,
    pub period_count: u32,
}

/// One settlement period resolved to absolute and civil time.
#[derive(Debug, Clone)]
pub struct SettlementSlot {
    pub settlement_date: NaiveDate,
    /// 1-based period number, at most the day's period count.
    pub settlement_period: u32,
    pub utc: DateTime<Utc>,
    pub local: DateTime<Tz>,
    pub local_is_dst: bool,
    /// Category of the slot's *local* calendar day. Derived independently
    /// of the per-day table, which classifies by UTC date.
    pub day_category: DayCategory,
}

impl SettlementSlot {
    /// Zero-padded period label, `"01"` through `"50"`.
    pub fn period_label(&self) -> String {
        format!("{:02}", self.settlement_period)
    }

    /// Mapping key in `YYYY-MM-DD_PP` form, the join column for datasets
    /// that carry only a settlement date and period number.
    pub fn datesp(&self) -> String {
        format!(
            "{}_{:02}",
            self.settlement_date.format("%Y-%m-%d"),
            self.settlement_period
        )
    }
}
