//! Rate limit signal returned by the API on HTTP 429.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder for rate limit metadata the API did not supply.
pub const UNKNOWN: &str = "unknown";

/// Metadata extracted from a 429 response body.
///
/// Every field has a sentinel (`-1` or [`UNKNOWN`]) so a malformed body still
/// produces a usable signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display(
    "rate limited on route {} with bot id {} (ip: {}), retry after: {}",
    route,
    bot_id,
    ip,
    retry_after
)]
pub struct RateLimitSignal {
    /// Seconds to wait before retrying, `-1` when unknown
    pub retry_after: i64,
    /// Bot id the limit was applied to
    pub bot_id: String,
    /// Client address the limit was applied to
    pub ip: String,
    /// Route that was limited
    pub route: String,
}

impl RateLimitSignal {
    /// A signal where nothing is known beyond the 429 status itself.
    pub fn unknown() -> Self {
        Self {
            retry_after: -1,
            bot_id: UNKNOWN.to_string(),
            ip: UNKNOWN.to_string(),
            route: UNKNOWN.to_string(),
        }
    }

    /// Delay to honor before retrying, or `None` when the API did not say.
    pub fn retry_after(&self) -> Option<Duration> {
        u64::try_from(self.retry_after).ok().map(Duration::from_secs)
    }
}

impl Default for RateLimitSignal {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Rate limit error with source location tracking.
///
/// # Examples
///
/// ```
/// use botblock_error::{RateLimitSignal, RateLimitedError};
/// use std::time::Duration;
///
/// let signal = RateLimitSignal {
///     retry_after: 30,
///     bot_id: "1".to_string(),
///     ip: "2".to_string(),
///     route: "/count".to_string(),
/// };
/// let err = RateLimitedError::new(signal);
/// assert_eq!(err.signal.retry_after(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limited: {} at line {} in {}", signal, line, file)]
pub struct RateLimitedError {
    /// Metadata from the 429 response
    pub signal: RateLimitSignal,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RateLimitedError {
    /// Create a new RateLimitedError with automatic location tracking.
    #[track_caller]
    pub fn new(signal: RateLimitSignal) -> Self {
        let location = std::panic::Location::caller();
        Self {
            signal,
            line: location.line(),
            file: location.file(),
        }
    }
}
