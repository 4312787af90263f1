use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Placeholder chain label used only when rendering; aggregation keys
/// used for counting keep missing chains as nulls.
pub const UNKNOWN_CHAIN: &str = "Unknown";

/// One interchain transfer event, normalized from either provider.
///
/// Optional fields stay `None` when the upstream record lacks a usable
/// value; they are excluded from sums downstream, never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source_chain: Option<String>,
    pub destination_chain: Option<String>,
    pub sender_address: Option<String>,
    pub amount: Option<Decimal>,
    pub amount_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
    pub token_symbol: Option<String>,
}

impl TransferRecord {
    /// Route label for display and path grouping, e.g. "Ethereum → Base".
    pub fn path_label(&self) -> String {
        Self::path_label_of(self.source_chain.as_deref(), self.destination_chain.as_deref())
    }

    pub fn path_label_of(source: Option<&str>, destination: Option<&str>) -> String {
        format!(
            "{} → {}",
            source.unwrap_or(UNKNOWN_CHAIN),
            destination.unwrap_or(UNKNOWN_CHAIN),
        )
    }
}

/// Row of the `its_token_deployments` analytical view: one
/// InterchainTokenDeploymentStarted event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TokenDeployment {
    pub created_at: DateTime<Utc>,
    pub token_id: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub deployer: Option<String>,
    pub deployed_chain: Option<String>,
    pub fee_usd: Option<Decimal>,
}
