// Client orchestrates both fetches + the published state
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::config::ClientSettings;
use crate::error::{FetchError, FetchResult};
use crate::market_data::adapters::Transport;
use crate::market_data::snapshot::ActiveCoinsSnapshot;
use crate::market_data::state::{MarketDataState, LOAD_FAILED_MESSAGE};
use crate::market_data::types::{
    ActiveCoinsFile, ApiEnvelope, MarketSnapshot, ACTIVE_COINS_PATH, TOP100_PATH,
};
use serde_json::Value;

/// Used when neither upstream gave a usable error message.
const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to fetch market data";

/// Paths of the two resources, relative to the transport's origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub top100_path: String,
    pub active_coins_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            top100_path: TOP100_PATH.into(),
            active_coins_path: ACTIVE_COINS_PATH.into(),
        }
    }
}

impl From<&ClientSettings> for Endpoints {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            top100_path: settings.top100_path.clone(),
            active_coins_path: settings.active_coins_path.clone(),
        }
    }
}

/// Result of merging the two upstream envelopes.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded {
        market: Option<MarketSnapshot>,
        active: Option<ActiveCoinsSnapshot>,
    },
    /// An upstream reported `API_KEY_NOT_CONFIGURED`: filtering is off, nothing to show.
    KeyNotConfigured,
}

/// Loads the top-100 and active-coin lists once and publishes the merged
/// [`MarketDataState`] through a watch channel.
pub struct MarketDataClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    started: AtomicBool,
    state: watch::Sender<MarketDataState>,
}

impl MarketDataClient {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        let (state, _) = watch::channel(MarketDataState::default());
        Self {
            transport,
            endpoints,
            started: AtomicBool::new(false),
            state,
        }
    }

    /// Current state (cloned).
    pub fn state(&self) -> MarketDataState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MarketDataState> {
        self.state.subscribe()
    }

    /// Wait until the load has resolved one way or another.
    ///
    /// Never returns if `load` is never triggered.
    pub async fn settled(&self) -> MarketDataState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|s| !s.loading).await.map(|s| (*s).clone());
        // The sender lives in `self`, so the channel cannot close under us.
        settled.unwrap_or_else(|_| self.state())
    }

    pub fn is_top100_coin(&self, symbol: &str) -> bool {
        self.state.borrow().is_top100_coin(symbol)
    }

    pub fn is_active_coin(&self, symbol: &str) -> bool {
        self.state.borrow().is_active_coin(symbol)
    }

    pub fn has_active_data(&self) -> bool {
        self.state.borrow().has_active_data()
    }

    /// Fetch both lists and publish the result. Only the first call does any
    /// work; later calls return immediately.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Market data load already triggered, ignoring");
            return;
        }

        info!(
            top100 = %self.endpoints.top100_path,
            active = %self.endpoints.active_coins_path,
            "Loading market data"
        );
        let outcome = self.fetch().await;
        self.state.send_modify(|state| apply_outcome(state, outcome));
    }

    /// Run [`Self::load`] on the runtime without waiting for it.
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.load().await })
    }

    async fn fetch(&self) -> FetchResult<LoadOutcome> {
        // Both requests in flight together; both must settle before we look at either.
        let (top, active) = futures::join!(
            self.transport.get(&self.endpoints.top100_path),
            self.transport.get(&self.endpoints.active_coins_path),
        );
        let (top, active) = (top?, active?);

        if !top.is_success() || !active.is_success() {
            return Err(FetchError::HttpStatus {
                top100: top.status,
                active: active.status,
            });
        }

        // `data` stays untyped until we know the envelope reports success.
        let top: ApiEnvelope<Value> = serde_json::from_str(&top.body)?;
        let active: ApiEnvelope<Value> = serde_json::from_str(&active.body)?;
        merge(top, active)
    }
}

/// Combine the two envelopes. `data` is only looked at when both report success.
///
/// The ranking must decode as a [`MarketSnapshot`]; the active list is read
/// best-effort, with unusable fields falling back to empty/zero/now.
pub fn merge(top: ApiEnvelope<Value>, active: ApiEnvelope<Value>) -> FetchResult<LoadOutcome> {
    if !top.success || !active.success {
        if top.is_key_not_configured() || active.is_key_not_configured() {
            return Ok(LoadOutcome::KeyNotConfigured);
        }
        let message = top
            .error_message()
            .or_else(|| active.error_message())
            .unwrap_or(UPSTREAM_FALLBACK_MESSAGE);
        return Err(FetchError::Upstream(message.to_string()));
    }

    let market = match top.data {
        Some(data) => Some(serde_json::from_value::<MarketSnapshot>(data)?),
        None => None,
    };
    let active = active
        .data
        .map(|data| ActiveCoinsSnapshot::from_file(ActiveCoinsFile::from_value_lenient(data)));

    Ok(LoadOutcome::Loaded { market, active })
}

fn apply_outcome(state: &mut MarketDataState, outcome: FetchResult<LoadOutcome>) {
    let label = match outcome {
        Ok(LoadOutcome::Loaded { market, active }) => {
            info!(
                coins = market.as_ref().map_or(0, |m| m.coins.len()),
                active_symbols = active.as_ref().map_or(0, |a| a.active_symbols.len()),
                "Market data loaded"
            );
            state.market_data = market;
            if active.is_some() {
                state.active_coins = active;
            }
            state.api_key_configured = true;
            state.error = None;
            state.error_detail = None;
            "loaded"
        }
        Ok(LoadOutcome::KeyNotConfigured) => {
            info!("Market data API key not configured, filters disabled");
            state.api_key_configured = false;
            state.error = None;
            state.error_detail = None;
            "key_not_configured"
        }
        Err(e) => {
            error!(error = %e, "Failed to load market data");
            state.error = Some(LOAD_FAILED_MESSAGE.to_string());
            state.error_detail = Some(e.to_string());
            "failed"
        }
    };
    state.loading = false;
    metrics::counter!("coinlens_market_data_loads_total", "outcome" => label).increment(1);
}
