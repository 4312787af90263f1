pub mod aggregate;
pub mod transfer;
pub mod warehouse;

pub use aggregate::{
    AggregateRow, CategoryCount, DimensionTotal, SenderRow, SummaryStats, TrendRow,
    VolumeClassRow, VolumeClassTotal, WeekdayRow,
};
pub use transfer::{TokenDeployment, TransferRecord, UNKNOWN_CHAIN};
pub use warehouse::{
    DeployChainRow, DeployStatsRow, DeployerTrendRow, PathTotalRow, SummaryRow, TimeseriesRow,
    WarehouseTransfer, WeekdaySqlRow,
};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Timeframe
// ---------------------------------------------------------------------------

/// Time-bucket granularity selected in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    Week,
    Month,
}

impl Timeframe {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "day" => Some(Timeframe::Day),
            "week" => Some(Timeframe::Week),
            "month" => Some(Timeframe::Month),
            _ => None,
        }
    }

    /// Truncate an instant to the start of its bucket: the calendar day,
    /// the Monday of the ISO week, or the first of the month.
    pub fn truncate(&self, ts: DateTime<Utc>) -> NaiveDate {
        let date = ts.date_naive();
        match self {
            Timeframe::Day => date,
            Timeframe::Week => {
                date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            Timeframe::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Day => write!(f, "day"),
            Timeframe::Week => write!(f, "week"),
            Timeframe::Month => write!(f, "month"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dimension
// ---------------------------------------------------------------------------

/// Optional categorical grouping applied on top of the time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Path,
    TokenSymbol,
    SenderAddress,
}

impl Dimension {
    /// Grouping key for a record. Paths always group (missing chains
    /// render as "Unknown" in the label); records missing a token symbol
    /// or sender address are not countable under those dimensions.
    pub fn key_for(&self, record: &TransferRecord) -> Option<String> {
        match self {
            Dimension::Path => Some(record.path_label()),
            Dimension::TokenSymbol => record.token_symbol.clone(),
            Dimension::SenderAddress => record.sender_address.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timeframe_from_api_str() {
        assert_eq!(Timeframe::from_api_str("day"), Some(Timeframe::Day));
        assert_eq!(Timeframe::from_api_str("Week"), Some(Timeframe::Week));
        assert_eq!(Timeframe::from_api_str("MONTH"), Some(Timeframe::Month));
        assert_eq!(Timeframe::from_api_str("hour"), None);
    }

    #[test]
    fn test_truncate_day() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        assert_eq!(
            Timeframe::Day.truncate(ts),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
    }

    #[test]
    fn test_truncate_week_starts_monday() {
        // 2025-03-14 is a Friday; the ISO week starts on Monday 2025-03-10.
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert_eq!(
            Timeframe::Week.truncate(ts),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );

        // A Monday truncates to itself.
        let monday = Utc.with_ymd_and_hms(2025, 3, 10, 23, 59, 59).unwrap();
        assert_eq!(
            Timeframe::Week.truncate(monday),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_truncate_month() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(
            Timeframe::Month.truncate(ts),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }
}
