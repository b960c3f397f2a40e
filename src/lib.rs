pub mod api;            // HTTP surface serving the active-coins file
pub mod config;         // layered settings (defaults -> toml -> env)
pub mod error;
pub mod market_data;    // client side: fetch, merge, lookup
pub mod telemetry;
