// One-shot market data load against a running server, then symbol lookups.
// Run with: cargo run --bin coinlens-check -- --base-url http://127.0.0.1:3000 btc eth

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use coinlens_rs::config::Settings;
use coinlens_rs::market_data::adapters::http::HttpTransport;
use coinlens_rs::market_data::{Endpoints, MarketDataClient};
use coinlens_rs::telemetry;

#[derive(Debug, Parser)]
#[command(name = "coinlens-check", version, about = "Check symbols against the top-100 and active lists")]
struct Cli {
    /// Config file (defaults to an optional ./coinlens.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override client.base_url
    #[arg(long)]
    base_url: Option<String>,

    /// Symbols to look up, e.g. BTC eth " sol "
    symbols: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.client.base_url = base_url;
    }
    telemetry::init_tracing(&settings.log)?;

    let transport = Arc::new(HttpTransport::new(&settings.client.base_url)?);
    let client = MarketDataClient::new(transport, Endpoints::from(&settings.client));
    client.load().await;
    let state = client.state();

    println!("=== Market data ({}) ===", settings.client.base_url);
    println!("API key configured: {}", state.api_key_configured);
    if let Some(err) = &state.error {
        println!("Error: {}", err);
    }
    match &state.market_data {
        Some(market) => println!(
            "Top-100 coins: {} (as of {})",
            market.coins.len(),
            market.timestamp.map_or_else(|| "unknown".to_string(), |t| t.to_string())
        ),
        None => println!("Top-100 coins: not loaded, every symbol passes"),
    }
    match &state.active_coins {
        Some(active) => println!(
            "Active coins: {} of {} checked (as of {})",
            active.active_symbols.len(),
            active.total_checked,
            active.timestamp
        ),
        None => println!("Active coins: not loaded, every symbol passes"),
    }
    println!("Has active data: {}", state.has_active_data());

    for symbol in &cli.symbols {
        println!(
            "{:>10}  top100={:<5} active={}",
            symbol.trim(),
            state.is_top100_coin(symbol),
            state.is_active_coin(symbol)
        );
    }

    Ok(())
}
