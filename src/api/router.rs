use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_auth;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Dashboard data routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Interchain transfers
        .route("/api/transfers/chart", get(handlers::transfers::chart))
        .route("/api/transfers/summary", get(handlers::transfers::summary))
        .route("/api/transfers/timeseries", get(handlers::transfers::timeseries))
        .route("/api/transfers/paths", get(handlers::transfers::paths))
        .route("/api/transfers/distribution", get(handlers::transfers::distribution))
        .route("/api/transfers/table", get(handlers::transfers::table))
        .route("/api/transfers/weekday", get(handlers::transfers::weekday))
        // ITS tokens
        .route("/api/tokens/top", get(handlers::tokens::top))
        .route("/api/tokens/monitor", get(handlers::tokens::monitor))
        // Token deployments
        .route("/api/deployments/summary", get(handlers::deployments::summary))
        .route("/api/deployments/timeseries", get(handlers::deployments::timeseries))
        .route("/api/deployments/table", get(handlers::deployments::table))
        .layer(middleware::from_fn(require_auth));

    // CORS: the dashboard is served from another origin; all routes are
    // read-only GETs.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
