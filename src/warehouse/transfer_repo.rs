//! Read-only queries against the `its_transfers` analytical view — one
//! row per executed ITS transfer, with the upstream's semi-structured
//! fields already projected to typed columns.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{
    PathTotalRow, SummaryRow, TimeseriesRow, Timeframe, VolumeClassRow, VolumeClassTotal,
    WarehouseTransfer, WeekdaySqlRow,
};

/// Magnitude band for a transfer's native amount, mirrored by
/// `pipeline::aggregate::volume_class` for the HTTP provider.
const VOLUME_CLASS_CASE: &str = r#"
    CASE
        WHEN amount <= 0.01 THEN 'V<=0.01'
        WHEN amount <= 0.1 THEN '0.01<V<=0.1'
        WHEN amount <= 1 THEN '0.1<V<=1'
        WHEN amount <= 10 THEN '1<V<=10'
        WHEN amount <= 100 THEN '10<V<=100'
        WHEN amount <= 1000 THEN '100<V<=1k'
        WHEN amount <= 10000 THEN '1k<V<=10k'
        WHEN amount <= 20000 THEN '10k<V<=20k'
        WHEN amount <= 50000 THEN '20k<V<=50k'
        WHEN amount <= 100000 THEN '50k<V<=100k'
        WHEN amount <= 1000000 THEN '100k<V<=1m'
        WHEN amount <= 10000000 THEN '1m<V<=10m'
        WHEN amount <= 100000000 THEN '10m<V<=100m'
        WHEN amount <= 1000000000 THEN '100m<V<=1b'
        ELSE 'V>1b'
    END
"#;

/// Headline totals for one token symbol (summary cards).
pub async fn summary(
    pool: &PgPool,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<SummaryRow> {
    let row = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT
            SUM(amount)                    AS volume,
            SUM(amount_usd)                AS volume_usd,
            COUNT(DISTINCT tx_id)          AS transfer_count,
            COUNT(DISTINCT sender_address) AS sender_count
        FROM its_transfers
        WHERE token_symbol = $1
          AND created_at::date BETWEEN $2 AND $3
        "#,
    )
    .bind(symbol)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Per-(bucket, path) metrics for one token symbol. Chains stay
/// nullable; labels are rendered at the API layer.
pub async fn timeseries(
    pool: &PgPool,
    symbol: &str,
    timeframe: Timeframe,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<TimeseriesRow>> {
    let rows = sqlx::query_as::<_, TimeseriesRow>(
        r#"
        SELECT
            DATE_TRUNC($4, created_at)     AS bucket,
            source_chain,
            destination_chain,
            COUNT(DISTINCT tx_id)          AS transfer_count,
            COUNT(DISTINCT sender_address) AS sender_count,
            SUM(amount)                    AS volume,
            SUM(amount_usd)                AS volume_usd,
            SUM(fee_usd)                   AS fee_usd
        FROM its_transfers
        WHERE token_symbol = $1
          AND created_at::date BETWEEN $2 AND $3
        GROUP BY 1, 2, 3
        ORDER BY 1
        "#,
    )
    .bind(symbol)
    .bind(from)
    .bind(to)
    .bind(timeframe.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Whole-range totals per path (donut data).
pub async fn path_totals(
    pool: &PgPool,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<PathTotalRow>> {
    let rows = sqlx::query_as::<_, PathTotalRow>(
        r#"
        SELECT
            source_chain,
            destination_chain,
            COUNT(DISTINCT tx_id)          AS transfer_count,
            COUNT(DISTINCT sender_address) AS sender_count,
            SUM(amount)                    AS volume,
            SUM(amount_usd)                AS volume_usd,
            SUM(fee_usd)                   AS fee_usd
        FROM its_transfers
        WHERE token_symbol = $1
          AND created_at::date BETWEEN $2 AND $3
        GROUP BY 1, 2
        ORDER BY volume_usd DESC NULLS LAST
        "#,
    )
    .bind(symbol)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// The N most recent transfers for the tracker table.
pub async fn recent_transfers(
    pool: &PgPool,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
    limit: i64,
) -> anyhow::Result<Vec<WarehouseTransfer>> {
    let rows = sqlx::query_as::<_, WarehouseTransfer>(
        r#"
        SELECT tx_id, created_at, sender_address, source_chain, destination_chain,
               token_symbol, amount, amount_usd, fee_usd
        FROM its_transfers
        WHERE token_symbol = $1
          AND created_at::date BETWEEN $2 AND $3
        ORDER BY created_at DESC
        LIMIT $4
        "#,
    )
    .bind(symbol)
    .bind(from)
    .bind(to)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Activity per ISO day of week (1 = Monday .. 7 = Sunday).
pub async fn weekday_breakdown(
    pool: &PgPool,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<WeekdaySqlRow>> {
    let rows = sqlx::query_as::<_, WeekdaySqlRow>(
        r#"
        SELECT
            EXTRACT(ISODOW FROM created_at)::int AS day_number,
            COUNT(DISTINCT tx_id)                AS transfer_count,
            COUNT(DISTINCT sender_address)       AS sender_count,
            SUM(amount)                          AS volume
        FROM its_transfers
        WHERE token_symbol = $1
          AND created_at::date BETWEEN $2 AND $3
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(symbol)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Distinct transfers per (bucket, volume class). Rows without an amount
/// cannot be classified and are excluded, not counted as zero.
pub async fn volume_distribution(
    pool: &PgPool,
    symbol: &str,
    timeframe: Timeframe,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<VolumeClassRow>> {
    let query = format!(
        r#"
        SELECT
            DATE_TRUNC($4, created_at)::date AS bucket,
            {VOLUME_CLASS_CASE} AS class,
            COUNT(DISTINCT tx_id)::int8 AS transfer_count
        FROM its_transfers
        WHERE token_symbol = $1
          AND created_at::date BETWEEN $2 AND $3
          AND amount IS NOT NULL
        GROUP BY 1, 2
        ORDER BY 1
        "#
    );

    let rows: Vec<(NaiveDate, String, i64)> = sqlx::query_as(&query)
        .bind(symbol)
        .bind(from)
        .bind(to)
        .bind(timeframe.to_string())
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(bucket, class, transfer_count)| VolumeClassRow {
            bucket,
            class,
            transfer_count: transfer_count.max(0) as u64,
        })
        .collect())
}

/// Distinct transfers per volume class over the whole range.
pub async fn volume_distribution_totals(
    pool: &PgPool,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<VolumeClassTotal>> {
    let query = format!(
        r#"
        SELECT
            {VOLUME_CLASS_CASE} AS class,
            COUNT(DISTINCT tx_id)::int8 AS transfer_count
        FROM its_transfers
        WHERE token_symbol = $1
          AND created_at::date BETWEEN $2 AND $3
          AND amount IS NOT NULL
        GROUP BY 1
        "#
    );

    let rows: Vec<(String, i64)> = sqlx::query_as(&query)
        .bind(symbol)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(class, transfer_count)| VolumeClassTotal {
            class,
            transfer_count: transfer_count.max(0) as u64,
        })
        .collect())
}
