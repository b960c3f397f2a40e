use crate::market_data::normaliser::timestamp_ms_or_now;
use crate::market_data::types::ActiveCoinsFile;

/// Active-coin list as held by one client instance.
///
/// Built once from an [`ActiveCoinsFile`] and replaced wholesale on the next
/// load, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCoinsSnapshot {
    /// Taken as-is from the source file; membership is a linear scan.
    pub active_symbols: Vec<String>,
    pub timestamp: i64, // epoch millis
    pub total_checked: u64,
    /// Always 0: the list comes from a static file, not a live API.
    pub api_calls_made: u64,
}

impl ActiveCoinsSnapshot {
    pub fn from_file(file: ActiveCoinsFile) -> Self {
        Self {
            timestamp: timestamp_ms_or_now(&file.timestamp),
            total_checked: file.total,
            active_symbols: file.symbols,
            api_calls_made: 0,
        }
    }

    /// Exact comparison; `symbol` is expected to be normalised already.
    pub fn contains(&self, symbol: &str) -> bool {
        self.active_symbols.iter().any(|s| s == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.active_symbols.is_empty()
    }
}
