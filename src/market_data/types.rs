// Wire shapes shared by the Data Endpoint and the client.
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream ranking endpoint (external; consumed only).
pub const TOP100_PATH: &str = "/api/coinmarketcap/top100";
/// Served by `crate::api`.
pub const ACTIVE_COINS_PATH: &str = "/api/active-coins";

/// `error` value meaning "feature disabled", not "something broke".
pub const API_KEY_NOT_CONFIGURED: &str = "API_KEY_NOT_CONFIGURED";

/// `{ success, data?, error? }` as returned by both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// A non-string `error` reads as absent.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    /// `error`, unless it is missing or empty.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    pub fn is_key_not_configured(&self) -> bool {
        self.error.as_deref() == Some(API_KEY_NOT_CONFIGURED)
    }
}

// Source: GET /api/coinmarketcap/top100 -> data.coins[]
// Only `symbol` is ever read; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "cmc_rank",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub rank: Option<i64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<i64>, // 0/1 flag
    /// Fields we don't model (e.g. CMC `quote`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Top-100 payload, stored verbatim as the market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub coins: Vec<CoinRecord>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>, // epoch millis
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `public/data/active-coins.json`, also the `data` of `GET /api/active-coins`.
///
/// Written by an external job and echoed unvalidated by the endpoint, so reads
/// never fail on a field: null or wrong-typed values become empty/zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveCoinsFile {
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: String, // ISO-8601, "" when unusable
    #[serde(deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(deserialize_with = "lenient_symbols")]
    pub symbols: Vec<String>,
}

impl ActiveCoinsFile {
    /// "No data yet" payload stamped with `timestamp`.
    pub fn empty_at(timestamp: String) -> Self {
        Self { timestamp, total: 0, symbols: Vec::new() }
    }

    /// Best-effort read of an arbitrary `data` value. Non-objects read as empty.
    pub fn from_value_lenient(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Any value that doesn't decode as `T` (including null) becomes `T::default()`.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Non-negative numbers (floats truncated); anything else is 0.
fn lenient_count<'de, D: Deserializer<'de>>(de: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(de)?;
    let count = match &value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

/// String entries of an array; non-strings are skipped, non-arrays read as empty.
fn lenient_symbols<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_top100_envelope() {
        let body = r#"{
            "success": true,
            "data": {
                "coins": [
                    {"id": 1, "name": "Bitcoin", "symbol": "BTC", "cmc_rank": 1, "is_active": 1},
                    {"id": 1027, "name": "Ethereum", "symbol": "ETH", "cmc_rank": 2, "is_active": 1}
                ],
                "timestamp": 1704067200000
            }
        }"#;
        let env: ApiEnvelope<MarketSnapshot> = serde_json::from_str(body).unwrap();
        assert!(env.success);
        let data = env.data.unwrap();
        assert_eq!(data.coins.len(), 2);
        assert_eq!(data.coins[1].symbol, "ETH");
        assert_eq!(data.coins[1].rank, Some(2));
        assert_eq!(data.timestamp, Some(1_704_067_200_000));
    }

    #[test]
    fn test_coin_keeps_unknown_fields_and_tolerates_gaps() {
        let body = r#"{
            "coins": [
                {"symbol": "BTC", "cmc_rank": null, "quote": {"USD": {"price": 42000.5}}},
                {"symbol": "ETH", "id": "not-a-number"}
            ],
            "timestamp": 1704067200000,
            "source": "cmc"
        }"#;
        let data: MarketSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(data.coins[0].rank, None);
        assert_eq!(data.coins[0].is_active, None);
        assert_eq!(data.coins[1].id, None);
        assert_eq!(data.extra["source"], "cmc");

        let echoed = serde_json::to_value(&data).unwrap();
        assert_eq!(echoed["coins"][0]["quote"]["USD"]["price"], 42000.5);
        assert_eq!(echoed["source"], "cmc");
    }

    #[test]
    fn test_active_file_null_and_wrong_types() {
        let file: ActiveCoinsFile =
            serde_json::from_str(r#"{"timestamp": null, "total": null, "symbols": null}"#).unwrap();
        assert_eq!(file, ActiveCoinsFile::default());

        let file: ActiveCoinsFile =
            serde_json::from_str(r#"{"timestamp": 17, "total": 2.0, "symbols": ["BTC", 5, null, "ETH"]}"#)
                .unwrap();
        assert!(file.timestamp.is_empty());
        assert_eq!(file.total, 2);
        assert_eq!(file.symbols, vec!["BTC".to_string(), "ETH".to_string()]);

        let file: ActiveCoinsFile =
            serde_json::from_str(r#"{"total": "lots", "symbols": "BTC"}"#).unwrap();
        assert_eq!(file.total, 0);
        assert!(file.symbols.is_empty());

        let file: ActiveCoinsFile = serde_json::from_str(r#"{"total": -3}"#).unwrap();
        assert_eq!(file.total, 0);
    }

    #[test]
    fn test_active_file_from_non_object() {
        assert_eq!(
            ActiveCoinsFile::from_value_lenient(serde_json::json!("oops")),
            ActiveCoinsFile::default()
        );
        assert_eq!(
            ActiveCoinsFile::from_value_lenient(serde_json::json!({"symbols": ["SOL"]})).symbols,
            vec!["SOL".to_string()]
        );
    }

    #[test]
    fn test_non_string_error_reads_as_absent() {
        let env: ApiEnvelope<Value> =
            serde_json::from_str(r#"{"success": false, "error": {"code": 7}}"#).unwrap();
        assert_eq!(env.error, None);
    }

    #[test]
    fn test_failure_envelope_has_no_data() {
        let env: ApiEnvelope<MarketSnapshot> =
            serde_json::from_str(r#"{"success": false, "error": "API_KEY_NOT_CONFIGURED"}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert!(env.is_key_not_configured());
    }

    #[test]
    fn test_missing_success_reads_as_false() {
        let env: ApiEnvelope<ActiveCoinsFile> = serde_json::from_str(r#"{"error": ""}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.error_message(), None);
    }

    #[test]
    fn test_active_file_fields_default() {
        let file: ActiveCoinsFile = serde_json::from_str(r#"{"symbols": ["BTC"]}"#).unwrap();
        assert_eq!(file.symbols, vec!["BTC".to_string()]);
        assert_eq!(file.total, 0);
        assert!(file.timestamp.is_empty());
    }

    #[test]
    fn test_failure_serialises_without_data() {
        let value = serde_json::to_value(ApiEnvelope::<()>::failure("boom")).unwrap();
        assert_eq!(value, serde_json::json!({"success": false, "error": "boom"}));
    }
}
