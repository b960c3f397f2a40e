use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::market_data::types::ApiEnvelope;

/// Failures the Data Endpoint reports to callers. Bodies use the same
/// `{ success: false, error }` envelope as successful responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method {0} Not Allowed")]
    MethodNotAllowed(Method),

    /// Cause is logged at the call site and never sent to the client.
    #[error("Failed to read active coins data")]
    ReadFailed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiEnvelope::<()>::failure(self.to_string()));
        match self {
            Self::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET")],
                body,
            )
                .into_response(),
            Self::ReadFailed => (StatusCode::INTERNAL_SERVER_ERROR, body).into_response(),
        }
    }
}
