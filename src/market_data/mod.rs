// Market data module entrypoint
pub mod adapters;       // transports that fetch raw upstream responses (HTTP, stubs)
pub mod client;         // loads both lists once and publishes the merged state
pub mod normaliser;     // symbol + timestamp normalisation
pub mod snapshot;       // active-coins snapshot derived from the raw file
pub mod state;          // observable state + fail-open lookups
pub mod types;          // wire envelopes and records

pub use client::{Endpoints, MarketDataClient};
pub use state::MarketDataState;
