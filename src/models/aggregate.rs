use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the in-process aggregation: a time bucket plus an optional
/// grouping dimension (path, token symbol, sender address).
///
/// Sums are `None` when no non-null value contributed; counts are
/// distinct counts, not row counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub bucket: NaiveDate,
    pub dimension: Option<String>,
    pub transfer_count: u64,
    pub sender_count: u64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
}

/// Per-bucket totals with the running cumulative transfer count — the
/// "Total Transfers" overlay line on the period bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    pub bucket: NaiveDate,
    pub transfer_count: u64,
    pub cumulative_count: u64,
    pub sender_count: u64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
}

/// Whole-range totals for one dimension value (donut/bar data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionTotal {
    pub dimension: String,
    pub transfer_count: u64,
    pub sender_count: u64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
}

/// Transfer counts per (bucket, volume class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeClassRow {
    pub bucket: NaiveDate,
    pub class: String,
    pub transfer_count: u64,
}

/// Transfer counts per volume class over the whole range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeClassTotal {
    pub class: String,
    pub transfer_count: u64,
}

/// Activity totals for one day of the week, Monday (1) through Sunday (7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayRow {
    pub day_number: u32,
    pub day_name: String,
    pub transfer_count: u64,
    pub sender_count: u64,
    pub volume: Option<Decimal>,
}

/// Per-sender activity totals (top-sender tables).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderRow {
    pub address: String,
    pub transfer_count: u64,
    pub volume_usd: Option<Decimal>,
}

/// Sender count per categorization bucket (by transfer count or volume).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub sender_count: u64,
}

/// Whole-range headline stats backing the KPI cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub transfer_count: u64,
    pub sender_count: u64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_total: Option<Decimal>,
    pub fee_median: Option<Decimal>,
    pub path_count: u64,
    pub source_chain_count: u64,
    pub destination_chain_count: u64,
}
