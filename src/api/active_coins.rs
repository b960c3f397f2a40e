use std::io::ErrorKind;
use std::sync::Arc;

use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, warn};

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::market_data::types::{ActiveCoinsFile, ApiEnvelope};

/// Relative to the data root (the process working directory in production).
pub const ACTIVE_COINS_FILE: &str = "public/data/active-coins.json";

/// GET /api/active-coins
///
/// Echoes the file's JSON verbatim. A missing file is "no data yet" and
/// yields an empty list stamped with the current time.
pub async fn get_active_coins(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let path = state.data_root.join(ACTIVE_COINS_FILE);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "active-coins.json not found, returning empty data");
            record("missing");
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            return Ok(Json(ApiEnvelope::success(ActiveCoinsFile::empty_at(now))).into_response());
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error reading active-coins.json");
            record("error");
            return Err(ApiError::ReadFailed);
        }
    };

    let data: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
        error!(path = %path.display(), error = %e, "Error parsing active-coins.json");
        record("error");
        ApiError::ReadFailed
    })?;

    debug!(bytes = bytes.len(), "Serving active-coins.json");
    record("ok");
    Ok(Json(ApiEnvelope::success(data)).into_response())
}

/// Any method other than GET/HEAD.
pub async fn method_not_allowed(method: Method) -> ApiError {
    record("method_not_allowed");
    ApiError::MethodNotAllowed(method)
}

fn record(outcome: &'static str) {
    metrics::counter!("coinlens_active_coins_requests_total", "outcome" => outcome).increment(1);
}
