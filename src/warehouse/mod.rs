pub mod deployment_repo;
pub mod transfer_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connect to the analytical warehouse. All queries in this module are
/// read-only; the service never writes.
pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}
