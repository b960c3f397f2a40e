// Shared trait + response type for market data transports

use crate::error::FetchResult;

/// Status and body of one upstream GET, before any JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` (e.g. "/api/active-coins") relative to the transport's origin.
    async fn get(&self, path: &str) -> FetchResult<RawResponse>;
}

pub mod http;
