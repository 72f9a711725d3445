//! Lenient extraction of rate limit metadata from a 429 body.

use botblock_error::{RateLimitSignal, UNKNOWN};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Parse the body of a 429 response into a [`RateLimitSignal`].
///
/// Never fails: a body that is not JSON, or that is missing fields, yields the
/// corresponding sentinels (`-1` for the delay, [`UNKNOWN`] for strings).
pub fn parse_rate_limit_signal(body: &str) -> RateLimitSignal {
    let json: JsonValue = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(e) => {
            debug!(error = %e, "Rate limit body is not JSON, using sentinel values");
            return RateLimitSignal::unknown();
        }
    };

    RateLimitSignal {
        retry_after: json.get("retry_after").and_then(as_delay).unwrap_or(-1),
        bot_id: string_field(&json, "ratelimit_bot_id"),
        ip: string_field(&json, "ratelimit_ip"),
        route: string_field(&json, "ratelimit_route"),
    }
}

// The API has sent both integer and fractional delays.
fn as_delay(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.ceil() as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_field(json: &JsonValue, key: &str) -> String {
    match json.get(key) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
