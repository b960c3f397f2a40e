// Convert wire strings into the forms the lookups compare against.

use chrono::{DateTime, NaiveDate, Utc};

/// Trim surrounding whitespace and uppercase, e.g. `" btc "` -> `"BTC"`.
pub fn normalise_symbol(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Parse an ISO-8601 timestamp into epoch millis.
///
/// Accepts full RFC 3339 (`2024-01-01T00:00:00Z`), a date-time without an
/// offset (read as UTC) and a bare date (midnight UTC). Anything else is `None`.
pub fn parse_timestamp_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    // No offset given
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Like [`parse_timestamp_ms`] but falls back to the current time.
pub fn timestamp_ms_or_now(s: &str) -> i64 {
    parse_timestamp_ms(s).unwrap_or_else(now_ms)
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
