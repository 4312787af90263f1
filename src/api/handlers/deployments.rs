use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::format;
use crate::cache::QueryCache;
use crate::errors::AppError;
use crate::models::{DeployStatsRow, TokenDeployment, UNKNOWN_CHAIN};
use crate::warehouse::deployment_repo;
use crate::AppState;

use super::{join_warnings, unwrap_or_warn, DataResponse, RangeParams};

// ---------------------------------------------------------------------------
// GET /api/deployments/summary
// ---------------------------------------------------------------------------

/// Display-formatted cards for the deployments page.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeploymentCards {
    pub token_count: String,
    pub deployer_count: String,
    pub gas_fees_usd: String,
}

impl DeploymentCards {
    fn from_row(row: &DeployStatsRow) -> Self {
        Self {
            token_count: format::thousands(row.token_count),
            deployer_count: format::thousands(row.deployer_count),
            gas_fees_usd: format::or_na(row.fee_total.map(format::usd)),
        }
    }

    fn empty() -> Self {
        Self {
            token_count: "0".into(),
            deployer_count: "0".into(),
            gas_fees_usd: "N/A".into(),
        }
    }
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<DataResponse<DeploymentCards>>, AppError> {
    let range = params.resolve()?;
    let cache_key = QueryCache::key(
        "deployments_summary",
        [range.from.to_string(), range.to.to_string()],
    );
    if let Some(data) = state.cache.get::<DeploymentCards>(&cache_key).await {
        return Ok(Json(DataResponse::ok(data)));
    }

    let patterns = state.config.contract_patterns();
    match deployment_repo::deploy_stats(&state.db, &patterns, range.from, range.to).await {
        Ok(row) => {
            let cards = DeploymentCards::from_row(&row);
            state.cache.put(&cache_key, &cards).await;
            Ok(Json(DataResponse::ok(cards)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Deployment stats query failed");
            ::metrics::counter!("upstream_failures_total").increment(1);
            Ok(Json(DataResponse::warn(
                DeploymentCards::empty(),
                "Data fetch failed for token deployments; showing empty results",
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /api/deployments/timeseries
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct DeployerTrendJson {
    pub bucket: NaiveDate,
    pub total_deployers: u64,
    pub new_deployers: u64,
    pub returning_deployers: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeployChainJson {
    pub bucket: NaiveDate,
    pub chain: String,
    pub token_count: u64,
    pub gas_fees_usd: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeploymentTimeseriesPayload {
    pub deployers: Vec<DeployerTrendJson>,
    pub tokens_by_chain: Vec<DeployChainJson>,
}

pub async fn timeseries(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<DataResponse<DeploymentTimeseriesPayload>>, AppError> {
    let range = params.resolve()?;
    let cache_key = QueryCache::key("deployments_timeseries", range.cache_args());
    if let Some(data) = state
        .cache
        .get::<DeploymentTimeseriesPayload>(&cache_key)
        .await
    {
        return Ok(Json(DataResponse::ok(data)));
    }

    let patterns = state.config.contract_patterns();
    let mut warnings = Vec::new();

    let deployers = deployment_repo::deployer_trend(
        &state.db,
        &patterns,
        range.timeframe,
        range.from,
        range.to,
    )
    .await;
    let (deployers, warning) = unwrap_or_warn(deployers, "token deployers");
    warnings.extend(warning);

    let by_chain = deployment_repo::tokens_by_chain(
        &state.db,
        &patterns,
        range.timeframe,
        range.from,
        range.to,
    )
    .await;
    let (by_chain, warning) = unwrap_or_warn(by_chain, "deployed tokens");
    warnings.extend(warning);

    let payload = DeploymentTimeseriesPayload {
        deployers: deployers
            .into_iter()
            .map(|row| {
                let total = row.total_deployers.max(0) as u64;
                let new = (row.new_deployers.max(0) as u64).min(total);
                DeployerTrendJson {
                    bucket: row.bucket.date_naive(),
                    total_deployers: total,
                    new_deployers: new,
                    returning_deployers: total - new,
                }
            })
            .collect(),
        tokens_by_chain: by_chain
            .into_iter()
            .map(|row| DeployChainJson {
                bucket: row.bucket.date_naive(),
                chain: row
                    .deployed_chain
                    .unwrap_or_else(|| UNKNOWN_CHAIN.to_string()),
                token_count: row.token_count.max(0) as u64,
                gas_fees_usd: row.fee_total,
            })
            .collect(),
    };

    let warning = join_warnings(warnings);
    if warning.is_none() {
        state.cache.put(&cache_key, &payload).await;
    }
    Ok(Json(DataResponse::with_warning(payload, warning)))
}

// ---------------------------------------------------------------------------
// GET /api/deployments/table
// ---------------------------------------------------------------------------

/// One display-formatted row of the recent-deployments tracker.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeploymentTableRow {
    pub date: String,
    pub token_name: String,
    pub token_symbol: String,
    pub deployer: String,
    pub chain: String,
    pub gas_fee_usd: String,
}

impl DeploymentTableRow {
    fn from_deployment(d: &TokenDeployment) -> Self {
        Self {
            date: d.created_at.format("%Y-%m-%d %H:%M").to_string(),
            token_name: d.token_name.clone().unwrap_or_default(),
            token_symbol: d.token_symbol.clone().unwrap_or_default(),
            deployer: d.deployer.clone().unwrap_or_default(),
            chain: d
                .deployed_chain
                .clone()
                .unwrap_or_else(|| UNKNOWN_CHAIN.to_string()),
            gas_fee_usd: format::or_na(d.fee_usd.map(|v| format::fixed(v, 3))),
        }
    }
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<DataResponse<Vec<DeploymentTableRow>>>, AppError> {
    let range = params.resolve()?;
    let limit = params.limit.unwrap_or(1000).clamp(1, 1000);

    let patterns = state.config.contract_patterns();
    let result =
        deployment_repo::recent_deployments(&state.db, &patterns, range.from, range.to, limit)
            .await;
    let (rows, warning) = unwrap_or_warn(result, "token deployments");

    let data: Vec<DeploymentTableRow> = rows
        .iter()
        .map(DeploymentTableRow::from_deployment)
        .collect();
    Ok(Json(DataResponse::with_warning(data, warning)))
}
