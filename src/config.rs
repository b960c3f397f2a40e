use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use crate::market_data::types::{ACTIVE_COINS_PATH, TOP100_PATH};

/// Environment variables with this prefix override file settings,
/// e.g. `COINLENS__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "COINLENS";

/// Looked up in the working directory when no explicit file is given.
pub const DEFAULT_CONFIG_NAME: &str = "coinlens";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub log: LogSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "127.0.0.1".into(), port: 3000 }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Origin both market data paths are resolved against.
    pub base_url: String,
    pub top100_path: String,
    pub active_coins_path: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".into(),
            top100_path: TOP100_PATH.into(),
            active_coins_path: ACTIVE_COINS_PATH.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    /// Colour codes in log lines; turn off when output goes to a file.
    pub ansi: bool,
    /// Prefix each event with its module path.
    pub targets: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".into(), ansi: true, targets: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Only used with the `metrics-exporter` feature.
    pub listen: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { listen: "0.0.0.0:9000".into() }
    }
}

impl Settings {
    /// Layer built-in defaults, an optional config file and `COINLENS__*` env vars.
    ///
    /// An explicit `path` must exist; the implicit `coinlens.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
