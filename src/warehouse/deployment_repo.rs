//! Read-only queries against the `its_token_deployments` analytical view
//! — one row per InterchainTokenDeploymentStarted event. The view keeps
//! the upstream status columns, so the executed/received filter stays in
//! the queries the way the dashboard's warehouse queries wrote it.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{DeployChainRow, DeployStatsRow, DeployerTrendRow, TokenDeployment, Timeframe};

/// Headline deployment stats over a date range (cards).
pub async fn deploy_stats(
    pool: &PgPool,
    contract_patterns: &[String],
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<DeployStatsRow> {
    let row = sqlx::query_as::<_, DeployStatsRow>(
        r#"
        SELECT
            COUNT(DISTINCT token_id)  AS token_count,
            COUNT(DISTINCT deployer)  AS deployer_count,
            SUM(fee_usd)              AS fee_total
        FROM its_token_deployments
        WHERE status = 'executed' AND simplified_status = 'received'
          AND contract_address ILIKE ANY($1)
          AND created_at::date BETWEEN $2 AND $3
        "#,
    )
    .bind(contract_patterns)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Per-bucket deployer activity: everyone active in the bucket vs. the
/// deployers whose first deployment ever falls in it. First deployments
/// are computed over all history, not just the selected range.
pub async fn deployer_trend(
    pool: &PgPool,
    contract_patterns: &[String],
    timeframe: Timeframe,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<DeployerTrendRow>> {
    let rows = sqlx::query_as::<_, DeployerTrendRow>(
        r#"
        WITH totals AS (
            SELECT DATE_TRUNC($4, created_at) AS bucket,
                   COUNT(DISTINCT deployer)   AS total_deployers
            FROM its_token_deployments
            WHERE status = 'executed' AND simplified_status = 'received'
              AND contract_address ILIKE ANY($1)
              AND created_at::date BETWEEN $2 AND $3
            GROUP BY 1
        ),
        firsts AS (
            SELECT deployer, MIN(created_at) AS first_at
            FROM its_token_deployments
            WHERE status = 'executed' AND simplified_status = 'received'
              AND contract_address ILIKE ANY($1)
            GROUP BY deployer
        ),
        new_per_bucket AS (
            SELECT DATE_TRUNC($4, first_at)  AS bucket,
                   COUNT(DISTINCT deployer)  AS new_deployers
            FROM firsts
            WHERE first_at::date BETWEEN $2 AND $3
            GROUP BY 1
        )
        SELECT t.bucket,
               t.total_deployers,
               COALESCE(n.new_deployers, 0) AS new_deployers
        FROM totals t
        LEFT JOIN new_per_bucket n ON n.bucket = t.bucket
        ORDER BY t.bucket
        "#,
    )
    .bind(contract_patterns)
    .bind(from)
    .bind(to)
    .bind(timeframe.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Tokens deployed and gas spent per (bucket, chain).
pub async fn tokens_by_chain(
    pool: &PgPool,
    contract_patterns: &[String],
    timeframe: Timeframe,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<DeployChainRow>> {
    let rows = sqlx::query_as::<_, DeployChainRow>(
        r#"
        SELECT
            DATE_TRUNC($4, created_at) AS bucket,
            deployed_chain,
            COUNT(DISTINCT token_id)   AS token_count,
            SUM(fee_usd)               AS fee_total
        FROM its_token_deployments
        WHERE status = 'executed' AND simplified_status = 'received'
          AND contract_address ILIKE ANY($1)
          AND created_at::date BETWEEN $2 AND $3
        GROUP BY 1, 2
        ORDER BY 1
        "#,
    )
    .bind(contract_patterns)
    .bind(from)
    .bind(to)
    .bind(timeframe.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// The N most recent deployments for the tracker table.
pub async fn recent_deployments(
    pool: &PgPool,
    contract_patterns: &[String],
    from: NaiveDate,
    to: NaiveDate,
    limit: i64,
) -> anyhow::Result<Vec<TokenDeployment>> {
    let rows = sqlx::query_as::<_, TokenDeployment>(
        r#"
        SELECT created_at, token_id, token_name, token_symbol, deployer,
               deployed_chain, fee_usd
        FROM its_token_deployments
        WHERE status = 'executed' AND simplified_status = 'received'
          AND contract_address ILIKE ANY($1)
          AND created_at::date BETWEEN $2 AND $3
        ORDER BY created_at DESC
        LIMIT $4
        "#,
    )
    .bind(contract_patterns)
    .bind(from)
    .bind(to)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
