use std::sync::Arc;

use itscope::api::router::create_router;
use itscope::axelarscan::AxelarscanClient;
use itscope::cache::QueryCache;
use itscope::config::AppConfig;
use itscope::{warehouse, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to warehouse...");
    let db = warehouse::init_pool(&config.database_url).await?;
    tracing::info!("Warehouse connected");

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()?;
    let axelarscan = AxelarscanClient::new(http, config.axelarscan_api_url.clone());
    let cache = Arc::new(QueryCache::new(config.cache_ttl()));
    let metrics_handle = itscope::metrics::init_metrics();

    tracing::info!(
        contracts = config.its_contracts.len(),
        cache_ttl_secs = config.cache_ttl_secs,
        api_url = %config.axelarscan_api_url,
        "Starting ITS analytics API"
    );

    let state = AppState {
        db,
        config,
        axelarscan,
        cache,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
