use thiserror::Error;

/// Everything that can go wrong while loading market data on the client side.
///
/// None of these reach observers directly; they are logged and folded into
/// `MarketDataState::error`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {top100} / {active}")]
    HttpStatus { top100: u16, active: u16 },

    #[error("invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    /// `success: false` from an upstream with a message other than the
    /// key-not-configured sentinel.
    #[error("{0}")]
    Upstream(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
