use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `its_transfers` analytical view: one executed ITS transfer
/// with the semi-structured upstream fields already projected to columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WarehouseTransfer {
    pub tx_id: String,
    pub created_at: DateTime<Utc>,
    pub sender_address: Option<String>,
    pub source_chain: Option<String>,
    pub destination_chain: Option<String>,
    pub token_symbol: Option<String>,
    pub amount: Option<Decimal>,
    pub amount_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
}

/// Headline totals for one token symbol (summary cards).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SummaryRow {
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub transfer_count: i64,
    pub sender_count: i64,
}

/// One (bucket, source chain, destination chain) aggregate from the
/// warehouse timeseries query. Chains stay nullable; the path label is
/// rendered at the API layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeseriesRow {
    pub bucket: DateTime<Utc>,
    pub source_chain: Option<String>,
    pub destination_chain: Option<String>,
    pub transfer_count: i64,
    pub sender_count: i64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
}

/// Whole-range totals per (source chain, destination chain).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PathTotalRow {
    pub source_chain: Option<String>,
    pub destination_chain: Option<String>,
    pub transfer_count: i64,
    pub sender_count: i64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
}

/// Activity totals per ISO day of week (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeekdaySqlRow {
    pub day_number: i32,
    pub transfer_count: i64,
    pub sender_count: i64,
    pub volume: Option<Decimal>,
}

/// Headline deployment stats over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeployStatsRow {
    pub token_count: i64,
    pub deployer_count: i64,
    pub fee_total: Option<Decimal>,
}

/// Per-bucket deployer activity: all active deployers vs. first-time ones.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeployerTrendRow {
    pub bucket: DateTime<Utc>,
    pub total_deployers: i64,
    pub new_deployers: i64,
}

/// Tokens deployed and gas spent per (bucket, chain).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeployChainRow {
    pub bucket: DateTime<Utc>,
    pub deployed_chain: Option<String>,
    pub token_count: i64,
    pub fee_total: Option<Decimal>,
}
