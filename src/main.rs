use std::path::PathBuf;

use clap::Parser;
use coinlens_rs::api::{self, AppState};
use coinlens_rs::config::Settings;
use coinlens_rs::telemetry;

/// Serves `GET /api/active-coins` from `public/data/active-coins.json`.
#[derive(Debug, Parser)]
#[command(name = "coinlens", version, about)]
struct Cli {
    /// Config file (defaults to an optional ./coinlens.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override server.bind
    #[arg(long)]
    bind: Option<String>,

    /// Override server.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    telemetry::init_tracing(&settings.log)?;
    telemetry::init_metrics(&settings.metrics.listen)?;

    // The data file is always resolved against the working directory.
    let data_root = std::env::current_dir()?;
    let state = AppState::new(data_root.clone());
    let app = api::app(state);

    let addr = settings.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, data_root = %data_root.display(), "coinlens listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully stopping");
}
