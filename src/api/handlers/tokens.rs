use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::format;
use crate::cache::QueryCache;
use crate::errors::AppError;
use crate::models::{
    CategoryCount, Dimension, DimensionTotal, SenderRow, TransferRecord, TrendRow,
};
use crate::pipeline::{aggregate, normalize};
use crate::AppState;

use super::{join_warnings, unwrap_or_warn, DataResponse, RangeParams, TokenParams};

// ---------------------------------------------------------------------------
// GET /api/tokens/top
// ---------------------------------------------------------------------------

/// Per-token transfer totals, joined with the asset registry so each
/// address carries its symbol. Unmapped addresses render as "Unknown".
#[derive(Debug, Serialize, Deserialize)]
pub struct TopTokenRow {
    pub token_address: String,
    pub symbol: String,
    pub transfer_count: u64,
    pub volume: Option<Decimal>,
}

pub async fn top(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<DataResponse<Vec<TopTokenRow>>>, AppError> {
    let range = params.resolve()?;
    let cache_key = QueryCache::key(
        "tokens_top",
        [range.from.to_string(), range.to.to_string()],
    );
    if let Some(data) = state.cache.get::<Vec<TopTokenRow>>(&cache_key).await {
        return Ok(Json(DataResponse::ok(data)));
    }

    let (from_time, to_time) = range.unix_bounds();
    let mut warnings = Vec::new();

    let (assets, warning) =
        unwrap_or_warn(state.axelarscan.top_its_assets(from_time, to_time).await, "top ITS assets");
    warnings.extend(warning);

    // Symbol lookup is best-effort: a registry failure degrades every
    // symbol to "Unknown" rather than hiding the totals.
    let mut address_to_symbol: HashMap<String, String> = HashMap::new();
    match state.axelarscan.its_assets().await {
        Ok(registry) => {
            for asset in &registry {
                if let Some(symbol) = &asset.symbol {
                    for address in asset.address_list() {
                        address_to_symbol.insert(address.to_lowercase(), symbol.clone());
                    }
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Asset registry fetch failed");
            ::metrics::counter!("upstream_failures_total").increment(1);
            warnings.push("Asset registry unavailable; token symbols missing".to_string());
        }
    }

    let data: Vec<TopTokenRow> = assets
        .into_iter()
        .filter_map(|asset| {
            let token_address = asset.key?;
            let symbol = address_to_symbol
                .get(&token_address.to_lowercase())
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());
            Some(TopTokenRow {
                token_address,
                symbol,
                transfer_count: asset.num_txs.unwrap_or(0),
                volume: asset.volume.and_then(Decimal::from_f64_retain),
            })
        })
        .collect();

    let warning = join_warnings(warnings);
    if warning.is_none() {
        state.cache.put(&cache_key, &data).await;
    }
    Ok(Json(DataResponse::with_warning(data, warning)))
}

// ---------------------------------------------------------------------------
// GET /api/tokens/monitor
// ---------------------------------------------------------------------------

/// Display-formatted KPI cards for the monitoring page.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorKpis {
    pub total_volume_usd: String,
    pub total_transfers: String,
    pub unique_senders: String,
    pub total_fees_usd: String,
    pub median_fee_usd: String,
    pub unique_paths: String,
    pub source_chains: String,
    pub destination_chains: String,
}

/// One (bucket, path) row with its share of the bucket's USD volume.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorPathRow {
    pub bucket: chrono::NaiveDate,
    pub path: String,
    pub transfer_count: u64,
    pub sender_count: u64,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
    pub volume_share: Option<Decimal>,
}

/// Everything the monitoring page renders from one searchGMP fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorPayload {
    pub kpis: MonitorKpis,
    pub trend: Vec<TrendRow>,
    pub by_path: Vec<MonitorPathRow>,
    pub path_totals: Vec<DimensionTotal>,
    pub top_senders_by_count: Vec<SenderRow>,
    pub top_senders_by_volume: Vec<SenderRow>,
    pub sender_tx_categories: Vec<CategoryCount>,
    pub sender_volume_categories: Vec<CategoryCount>,
}

pub async fn monitor(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<DataResponse<MonitorPayload>>, AppError> {
    let range = params.resolve()?;
    let mut cache_args = vec![params.symbol.clone()];
    cache_args.extend(range.cache_args());
    let cache_key = QueryCache::key("tokens_monitor", &cache_args);
    if let Some(data) = state.cache.get::<MonitorPayload>(&cache_key).await {
        return Ok(Json(DataResponse::ok(data)));
    }

    let (from_time, to_time) = range.unix_bounds();
    let result = state
        .axelarscan
        .search_gmp(&params.symbol, from_time, to_time, state.config.search_page_size)
        .await;
    let (raw, warning) = unwrap_or_warn(result, &params.symbol);

    let records = normalize::normalize_records(&raw);
    let payload = build_monitor_payload(&records, range.timeframe);

    if warning.is_none() {
        state.cache.put(&cache_key, &payload).await;
    }
    Ok(Json(DataResponse::with_warning(payload, warning)))
}

fn build_monitor_payload(
    records: &[TransferRecord],
    timeframe: crate::models::Timeframe,
) -> MonitorPayload {
    let stats = aggregate::summary(records);
    let kpis = MonitorKpis {
        total_volume_usd: format::or_na(stats.volume_usd.map(format::usd)),
        total_transfers: format::thousands(stats.transfer_count as i64),
        unique_senders: format::thousands(stats.sender_count as i64),
        total_fees_usd: format::or_na(stats.fee_total.map(format::usd)),
        median_fee_usd: format::or_na(stats.fee_median.map(|v| format::fixed(v, 4))),
        unique_paths: format::thousands(stats.path_count as i64),
        source_chains: format::thousands(stats.source_chain_count as i64),
        destination_chains: format::thousands(stats.destination_chain_count as i64),
    };

    let by_path_agg = aggregate::aggregate(records, timeframe, Some(Dimension::Path));
    let shares = aggregate::shares(&by_path_agg, |r| r.volume_usd);
    let by_path: Vec<MonitorPathRow> = by_path_agg
        .into_iter()
        .zip(shares)
        .map(|(row, volume_share)| MonitorPathRow {
            bucket: row.bucket,
            path: row.dimension.unwrap_or_default(),
            transfer_count: row.transfer_count,
            sender_count: row.sender_count,
            volume_usd: row.volume_usd,
            fee_usd: row.fee_usd,
            volume_share,
        })
        .collect();

    MonitorPayload {
        kpis,
        trend: aggregate::trend(records, timeframe),
        by_path,
        path_totals: aggregate::totals_by_dimension(records, Dimension::Path),
        top_senders_by_count: aggregate::top_senders_by_count(records, 10),
        top_senders_by_volume: aggregate::top_senders_by_volume(records, 10),
        sender_tx_categories: aggregate::sender_tx_categories(records),
        sender_volume_categories: aggregate::sender_volume_categories(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timeframe;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, day: u32, usd: i64) -> TransferRecord {
        TransferRecord {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, day, 8, 0, 0).unwrap(),
            source_chain: Some("ethereum".into()),
            destination_chain: Some("base".into()),
            sender_address: Some("0xsender".into()),
            amount: Some(Decimal::from(usd)),
            amount_usd: Some(Decimal::from(usd)),
            fee_usd: Some(Decimal::new(5, 1)),
            token_symbol: Some("ATH".into()),
        }
    }

    #[test]
    fn test_monitor_payload_empty_records() {
        let payload = build_monitor_payload(&[], Timeframe::Day);
        assert_eq!(payload.kpis.total_transfers, "0");
        assert_eq!(payload.kpis.total_volume_usd, "N/A");
        assert_eq!(payload.kpis.median_fee_usd, "N/A");
        assert!(payload.trend.is_empty());
        assert!(payload.by_path.is_empty());
    }

    #[test]
    fn test_monitor_payload_kpis_formatted() {
        let records = vec![record("a", 1, 1_000), record("b", 2, 500)];
        let payload = build_monitor_payload(&records, Timeframe::Day);
        assert_eq!(payload.kpis.total_transfers, "2");
        assert_eq!(payload.kpis.total_volume_usd, "$1,500.00");
        assert_eq!(payload.kpis.total_fees_usd, "$1.00");
        assert_eq!(payload.kpis.median_fee_usd, "0.5000");
        assert_eq!(payload.kpis.unique_paths, "1");
        assert_eq!(payload.trend.len(), 2);
        assert_eq!(payload.trend[1].cumulative_count, 2);
        // Single path owns the whole bucket volume.
        assert_eq!(payload.by_path[0].volume_share, Some(Decimal::ONE));
    }
}
