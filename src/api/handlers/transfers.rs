use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::format;
use crate::axelarscan::ChartPoint;
use crate::cache::QueryCache;
use crate::errors::AppError;
use crate::models::{
    AggregateRow, SummaryRow, Timeframe, TransferRecord, VolumeClassRow, VolumeClassTotal,
    WarehouseTransfer, WeekdayRow, UNKNOWN_CHAIN,
};
use crate::pipeline::aggregate;
use crate::warehouse::transfer_repo;
use crate::AppState;

use super::{join_warnings, unwrap_or_warn, DataResponse, RangeParams, TokenParams};

// ---------------------------------------------------------------------------
// GET /api/transfers/chart
// ---------------------------------------------------------------------------

/// Per-bucket transfer activity for one tracked ITS contract, with the
/// cumulative overlay series.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartBucket>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartBucket {
    pub bucket: NaiveDate,
    pub transfer_count: u64,
    pub cumulative_count: u64,
    pub volume: Option<Decimal>,
}

pub async fn chart(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<DataResponse<Vec<ChartSeries>>>, AppError> {
    let range = params.resolve()?;
    let cache_key = QueryCache::key("transfers_chart", range.cache_args());
    if let Some(data) = state.cache.get::<Vec<ChartSeries>>(&cache_key).await {
        return Ok(Json(DataResponse::ok(data)));
    }

    let (from_time, to_time) = range.unix_bounds();
    let mut series = Vec::new();
    let mut warnings = Vec::new();

    for contract in &state.config.its_contracts {
        let result = state
            .axelarscan
            .gmp_chart(&contract.address, from_time, to_time)
            .await;
        let (points, warning) = unwrap_or_warn(result, &contract.label);
        warnings.extend(warning);
        series.push(ChartSeries {
            label: contract.label.clone(),
            points: bucket_points(&points, range.timeframe),
        });
    }

    let warning = join_warnings(warnings);
    if warning.is_none() {
        state.cache.put(&cache_key, &series).await;
    }
    Ok(Json(DataResponse::with_warning(series, warning)))
}

/// Roll the API's per-day points up to the selected bucket size and
/// attach the running total.
fn bucket_points(points: &[ChartPoint], timeframe: Timeframe) -> Vec<ChartBucket> {
    let mut buckets: BTreeMap<NaiveDate, (u64, Option<Decimal>)> = BTreeMap::new();
    for point in points {
        let Some(ms) = point.timestamp else { continue };
        let Some(ts) = DateTime::from_timestamp_millis(ms) else {
            continue;
        };
        let entry = buckets.entry(timeframe.truncate(ts)).or_insert((0, None));
        entry.0 += point.num_txs.unwrap_or(0);
        if let Some(volume) = point.volume.and_then(Decimal::from_f64_retain) {
            entry.1 = Some(entry.1.unwrap_or(Decimal::ZERO) + volume);
        }
    }

    let mut cumulative = 0u64;
    buckets
        .into_iter()
        .map(|(bucket, (transfer_count, volume))| {
            cumulative += transfer_count;
            ChartBucket {
                bucket,
                transfer_count,
                cumulative_count: cumulative,
                volume,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// GET /api/transfers/summary
// ---------------------------------------------------------------------------

/// Display-formatted summary cards for one token symbol.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryCards {
    pub volume: String,
    pub volume_usd: String,
    pub transfer_count: String,
    pub sender_count: String,
}

impl SummaryCards {
    fn from_row(row: &SummaryRow) -> Self {
        Self {
            volume: format::or_na(row.volume.map(format::billions)),
            volume_usd: format::or_na(row.volume_usd.map(format::usd)),
            transfer_count: format::thousands(row.transfer_count),
            sender_count: format::thousands(row.sender_count),
        }
    }

    fn empty() -> Self {
        Self {
            volume: "N/A".into(),
            volume_usd: "N/A".into(),
            transfer_count: "0".into(),
            sender_count: "0".into(),
        }
    }
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<DataResponse<SummaryCards>>, AppError> {
    let range = params.resolve()?;
    let cache_key = QueryCache::key(
        "transfers_summary",
        [params.symbol.as_str(), &range.from.to_string(), &range.to.to_string()],
    );
    if let Some(data) = state.cache.get::<SummaryCards>(&cache_key).await {
        return Ok(Json(DataResponse::ok(data)));
    }

    match transfer_repo::summary(&state.db, &params.symbol, range.from, range.to).await {
        Ok(row) => {
            let cards = SummaryCards::from_row(&row);
            state.cache.put(&cache_key, &cards).await;
            Ok(Json(DataResponse::ok(cards)))
        }
        Err(e) => {
            tracing::warn!(error = %e, symbol = %params.symbol, "Summary query failed");
            ::metrics::counter!("upstream_failures_total").increment(1);
            Ok(Json(DataResponse::warn(
                SummaryCards::empty(),
                format!("Data fetch failed for {}; showing empty results", params.symbol),
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /api/transfers/timeseries
// ---------------------------------------------------------------------------

/// One (bucket, path) row with its share of the bucket's native volume.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathBucketRow {
    pub bucket: NaiveDate,
    pub path: String,
    pub transfer_count: u64,
    pub sender_count: u64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
    pub volume_share: Option<Decimal>,
}

pub async fn timeseries(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<DataResponse<Vec<PathBucketRow>>>, AppError> {
    let range = params.resolve()?;
    let mut cache_args = vec![params.symbol.clone()];
    cache_args.extend(range.cache_args());
    let cache_key = QueryCache::key("transfers_timeseries", &cache_args);
    if let Some(data) = state.cache.get::<Vec<PathBucketRow>>(&cache_key).await {
        return Ok(Json(DataResponse::ok(data)));
    }

    let result = transfer_repo::timeseries(
        &state.db,
        &params.symbol,
        range.timeframe,
        range.from,
        range.to,
    )
    .await;
    let (rows, warning) = unwrap_or_warn(result, &params.symbol);

    let agg_rows: Vec<AggregateRow> = rows
        .iter()
        .map(|r| AggregateRow {
            bucket: r.bucket.date_naive(),
            dimension: Some(TransferRecord::path_label_of(
                r.source_chain.as_deref(),
                r.destination_chain.as_deref(),
            )),
            transfer_count: r.transfer_count.max(0) as u64,
            sender_count: r.sender_count.max(0) as u64,
            volume: r.volume,
            volume_usd: r.volume_usd,
            fee_usd: r.fee_usd,
        })
        .collect();
    let shares = aggregate::shares(&agg_rows, |r| r.volume);

    let data: Vec<PathBucketRow> = agg_rows
        .into_iter()
        .zip(shares)
        .map(|(row, volume_share)| PathBucketRow {
            bucket: row.bucket,
            path: row.dimension.unwrap_or_default(),
            transfer_count: row.transfer_count,
            sender_count: row.sender_count,
            volume: row.volume,
            volume_usd: row.volume_usd,
            fee_usd: row.fee_usd,
            volume_share,
        })
        .collect();

    if warning.is_none() {
        state.cache.put(&cache_key, &data).await;
    }
    Ok(Json(DataResponse::with_warning(data, warning)))
}

// ---------------------------------------------------------------------------
// GET /api/transfers/paths
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct PathTotalJson {
    pub path: String,
    pub transfer_count: u64,
    pub sender_count: u64,
    pub volume: Option<Decimal>,
    pub volume_usd: Option<Decimal>,
    pub fee_usd: Option<Decimal>,
}

pub async fn paths(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<DataResponse<Vec<PathTotalJson>>>, AppError> {
    let range = params.resolve()?;

    let result = transfer_repo::path_totals(&state.db, &params.symbol, range.from, range.to).await;
    let (rows, warning) = unwrap_or_warn(result, &params.symbol);

    let data: Vec<PathTotalJson> = rows
        .into_iter()
        .map(|r| PathTotalJson {
            path: TransferRecord::path_label_of(
                r.source_chain.as_deref(),
                r.destination_chain.as_deref(),
            ),
            transfer_count: r.transfer_count.max(0) as u64,
            sender_count: r.sender_count.max(0) as u64,
            volume: r.volume,
            volume_usd: r.volume_usd,
            fee_usd: r.fee_usd,
        })
        .collect();

    Ok(Json(DataResponse::with_warning(data, warning)))
}

// ---------------------------------------------------------------------------
// GET /api/transfers/distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct DistributionPayload {
    pub by_bucket: Vec<VolumeClassRow>,
    pub totals: Vec<VolumeClassTotal>,
}

pub async fn distribution(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<DataResponse<DistributionPayload>>, AppError> {
    let range = params.resolve()?;

    let by_bucket = transfer_repo::volume_distribution(
        &state.db,
        &params.symbol,
        range.timeframe,
        range.from,
        range.to,
    )
    .await;
    let totals =
        transfer_repo::volume_distribution_totals(&state.db, &params.symbol, range.from, range.to)
            .await;

    let mut warnings = Vec::new();
    let (by_bucket, warning) = unwrap_or_warn(by_bucket, &params.symbol);
    warnings.extend(warning);
    let (totals, warning) = unwrap_or_warn(totals, &params.symbol);
    warnings.extend(warning);
    warnings.dedup();

    Ok(Json(DataResponse::with_warning(
        DistributionPayload { by_bucket, totals },
        join_warnings(warnings),
    )))
}

// ---------------------------------------------------------------------------
// GET /api/transfers/table
// ---------------------------------------------------------------------------

/// One display-formatted row of the recent-transfers tracker.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferTableRow {
    pub date: String,
    pub amount: String,
    pub amount_usd: String,
    pub source_chain: String,
    pub destination_chain: String,
    pub sender: String,
    pub fee_usd: String,
    pub tx_id: String,
}

impl TransferTableRow {
    fn from_transfer(t: &WarehouseTransfer) -> Self {
        Self {
            date: t.created_at.format("%Y-%m-%d %H:%M").to_string(),
            amount: format::or_na(t.amount.map(|v| format::fixed(v, 2))),
            amount_usd: format::or_na(t.amount_usd.map(format::usd)),
            source_chain: t
                .source_chain
                .clone()
                .unwrap_or_else(|| UNKNOWN_CHAIN.to_string()),
            destination_chain: t
                .destination_chain
                .clone()
                .unwrap_or_else(|| UNKNOWN_CHAIN.to_string()),
            sender: t.sender_address.clone().unwrap_or_default(),
            fee_usd: format::or_na(t.fee_usd.map(|v| format::fixed(v, 3))),
            tx_id: t.tx_id.clone(),
        }
    }
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<DataResponse<Vec<TransferTableRow>>>, AppError> {
    let range = params.resolve()?;
    let limit = params.limit.unwrap_or(1000).clamp(1, 1000);

    let result =
        transfer_repo::recent_transfers(&state.db, &params.symbol, range.from, range.to, limit)
            .await;
    let (rows, warning) = unwrap_or_warn(result, &params.symbol);

    let data: Vec<TransferTableRow> =
        rows.iter().map(TransferTableRow::from_transfer).collect();
    Ok(Json(DataResponse::with_warning(data, warning)))
}

// ---------------------------------------------------------------------------
// GET /api/transfers/weekday
// ---------------------------------------------------------------------------

pub async fn weekday(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<DataResponse<Vec<WeekdayRow>>>, AppError> {
    let range = params.resolve()?;

    let result =
        transfer_repo::weekday_breakdown(&state.db, &params.symbol, range.from, range.to).await;
    let (rows, warning) = unwrap_or_warn(result, &params.symbol);

    // All seven days are always present, Monday first.
    let mut data: Vec<WeekdayRow> = (1..=7u32)
        .map(|n| WeekdayRow {
            day_number: n,
            day_name: aggregate::weekday_label(n),
            transfer_count: 0,
            sender_count: 0,
            volume: None,
        })
        .collect();
    for row in rows {
        if (1..=7).contains(&row.day_number) {
            let slot = &mut data[(row.day_number - 1) as usize];
            slot.transfer_count = row.transfer_count.max(0) as u64;
            slot.sender_count = row.sender_count.max(0) as u64;
            slot.volume = row.volume;
        }
    }

    Ok(Json(DataResponse::with_warning(data, warning)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_points_cumulative() {
        // Three daily points, two in the same ISO week.
        let day = 86_400_000i64;
        let monday = 1_748_822_400_000i64; // 2025-06-02 (Monday)
        let points = vec![
            ChartPoint {
                timestamp: Some(monday),
                volume: Some(10.0),
                num_txs: Some(3),
            },
            ChartPoint {
                timestamp: Some(monday + day),
                volume: Some(5.0),
                num_txs: Some(2),
            },
            ChartPoint {
                timestamp: Some(monday + 7 * day),
                volume: None,
                num_txs: Some(4),
            },
        ];

        let daily = bucket_points(&points, Timeframe::Day);
        assert_eq!(daily.len(), 3);
        assert_eq!(daily.last().unwrap().cumulative_count, 9);

        let weekly = bucket_points(&points, Timeframe::Week);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].transfer_count, 5);
        assert_eq!(weekly[0].volume, Some(Decimal::from(15)));
        assert_eq!(weekly[1].volume, None, "no volume data stays null");
        assert_eq!(weekly[1].cumulative_count, 9);
    }

    #[test]
    fn test_bucket_points_skips_missing_timestamps() {
        let points = vec![ChartPoint {
            timestamp: None,
            volume: Some(1.0),
            num_txs: Some(1),
        }];
        assert!(bucket_points(&points, Timeframe::Day).is_empty());
    }
}
