pub mod api;
pub mod axelarscan;
pub mod cache;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod warehouse;

use std::sync::Arc;

use crate::axelarscan::AxelarscanClient;
use crate::cache::QueryCache;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub axelarscan: AxelarscanClient,
    pub cache: Arc<QueryCache>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
