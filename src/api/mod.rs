pub mod active_coins;
pub mod error;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::market_data::types::ACTIVE_COINS_PATH;

/// Shared application state, passed to handlers via `axum::extract::State`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Directory `public/data/active-coins.json` is resolved against.
    pub data_root: PathBuf,
}

impl AppState {
    pub fn new(data_root: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self { data_root: data_root.into() })
    }
}

/// Assemble the API routes.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new().route(
        ACTIVE_COINS_PATH,
        get(active_coins::get_active_coins).fallback(active_coins::method_not_allowed),
    )
}

/// Full application: API routes, health check and HTTP middleware.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api_router())
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
