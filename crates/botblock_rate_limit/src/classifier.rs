//! Status-code classification of API responses.

use crate::parse_rate_limit_signal;
use botblock_error::{
    BotBlockResult, RateLimitSignal, RateLimitedError, TransportError, TransportErrorKind,
};
use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Outcome of classifying one API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 2xx; the body may still carry per-destination failures
    Success,
    /// 429 with whatever metadata could be recovered
    RateLimited(RateLimitSignal),
    /// Any other non-2xx status
    Failed {
        /// HTTP status code
        status_code: u16,
        /// Server-supplied message, or the canonical reason phrase
        message: String,
    },
}

impl Classification {
    /// Attach a `Retry-After` header value when the body carried no delay.
    pub fn with_retry_after_header(self, header: Option<u64>) -> Self {
        match (self, header) {
            (Classification::RateLimited(mut signal), Some(seconds)) if signal.retry_after < 0 => {
                signal.retry_after = i64::try_from(seconds).unwrap_or(i64::MAX);
                Classification::RateLimited(signal)
            }
            (other, _) => other,
        }
    }

    /// True for 2xx responses.
    pub fn is_success(&self) -> bool {
        matches!(self, Classification::Success)
    }

    /// Convert into the crate-wide result type.
    #[track_caller]
    pub fn into_result(self) -> BotBlockResult<()> {
        match self {
            Classification::Success => Ok(()),
            Classification::RateLimited(signal) => Err(RateLimitedError::new(signal).into()),
            Classification::Failed {
                status_code,
                message,
            } => Err(TransportError::new(TransportErrorKind::Status {
                status_code,
                message,
            })
            .into()),
        }
    }
}

/// Classify a response by status code and body.
///
/// A 2xx status is never an error here, even if the body contains a `failure`
/// object. A 429 is always a rate limit, even if the body is garbage.
pub fn classify(status_code: u16, body: &str) -> Classification {
    if (200..300).contains(&status_code) {
        debug!(status_code, "Response classified as success");
        return Classification::Success;
    }

    if status_code == StatusCode::TOO_MANY_REQUESTS.as_u16() {
        let signal = parse_rate_limit_signal(body);
        warn!(
            retry_after = signal.retry_after,
            bot_id = %signal.bot_id,
            route = %signal.route,
            "BotBlock API rate limit hit"
        );
        return Classification::RateLimited(signal);
    }

    let message = server_message(body).unwrap_or_else(|| reason_phrase(status_code));
    debug!(status_code, %message, "Response classified as failure");
    Classification::Failed {
        status_code,
        message,
    }
}

fn server_message(body: &str) -> Option<String> {
    let json: JsonValue = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(JsonValue::as_str))
        .map(str::to_string)
}

fn reason_phrase(status_code: u16) -> String {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown")
        .to_string()
}
