use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;

/// Used when the configured level is not a valid filter directive.
const FALLBACK_FILTER: &str = "info";

/// `RUST_LOG` if set and valid, else `configured`, else [`FALLBACK_FILTER`].
fn env_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Install the global subscriber for both binaries.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(log: &LogSettings) -> anyhow::Result<()> {
    let layer = fmt::layer()
        .compact()
        .with_ansi(log.ansi)
        .with_target(log.targets);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(&log.level))
        .try_init()?;
    Ok(())
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(listen: &str) -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let addr: std::net::SocketAddr = listen.parse()?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Prometheus exporter listening on /metrics");
    metrics::gauge!("coinlens_up").set(1.0);
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(_listen: &str) -> anyhow::Result<()> {
    Ok(())
}
