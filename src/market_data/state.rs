use crate::market_data::normaliser::normalise_symbol;
use crate::market_data::snapshot::ActiveCoinsSnapshot;
use crate::market_data::types::MarketSnapshot;

/// User-facing message for every failed load. The cause only goes to the log
/// and `error_detail`.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load market data. Filter features may be limited.";

/// What a `MarketDataClient` publishes to its observers.
///
/// Lifecycle: `loading` starts true and flips to false exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketDataState {
    pub loading: bool,
    pub error: Option<String>,
    /// Underlying cause of `error`, for diagnostics (not meant for display).
    pub error_detail: Option<String>,
    pub market_data: Option<MarketSnapshot>,
    pub active_coins: Option<ActiveCoinsSnapshot>,
    /// False when an upstream answered `API_KEY_NOT_CONFIGURED`.
    pub api_key_configured: bool,
}

impl Default for MarketDataState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            error_detail: None,
            market_data: None,
            active_coins: None,
            api_key_configured: true,
        }
    }
}

impl MarketDataState {
    /// Fail-open: with no ranking loaded every symbol passes.
    pub fn is_top100_coin(&self, symbol: &str) -> bool {
        let Some(market) = &self.market_data else {
            return true;
        };
        let wanted = normalise_symbol(symbol);
        market
            .coins
            .iter()
            .any(|coin| coin.symbol.to_uppercase() == wanted)
    }

    /// Fail-open like [`Self::is_top100_coin`]. Stored symbols are compared
    /// as-is against the normalised input.
    pub fn is_active_coin(&self, symbol: &str) -> bool {
        match &self.active_coins {
            None => true,
            Some(active) => active.contains(&normalise_symbol(symbol)),
        }
    }

    pub fn has_active_data(&self) -> bool {
        self.active_coins.as_ref().is_some_and(|a| !a.is_empty())
    }
}
