//! Top-level error wrapper types.

use crate::{
    ConfigError, DestinationFailure, JsonError, PartialFailureError, PreconditionError,
    RateLimitSignal, RateLimitedError, SchedulerError, TransportError,
};

/// Every failure class a BotBlock operation can surface.
///
/// # Examples
///
/// ```
/// use botblock_error::{BotBlockError, PreconditionError};
///
/// let err: BotBlockError = PreconditionError::new("ID may not be empty.").into();
/// assert!(format!("{}", err).contains("Precondition Failed"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BotBlockErrorKind {
    /// Argument or configuration precondition violated before any I/O
    #[from(PreconditionError)]
    Precondition(PreconditionError),
    /// Network failure, empty body or non-2xx/non-429 status
    #[from(TransportError)]
    Transport(TransportError),
    /// HTTP 429 from the API
    #[from(RateLimitedError)]
    RateLimited(RateLimitedError),
    /// 2xx response whose body lists per-destination rejections
    #[from(PartialFailureError)]
    PartialFailure(PartialFailureError),
    /// Response body was not the JSON we expected
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration could not be loaded or validated
    #[from(ConfigError)]
    Config(ConfigError),
    /// Scheduler lifecycle misuse or task panic
    #[from(SchedulerError)]
    Scheduler(SchedulerError),
}

/// BotBlock error with kind discrimination.
///
/// # Examples
///
/// ```
/// use botblock_error::{BotBlockResult, TransportError, TransportErrorKind};
///
/// fn post() -> BotBlockResult<()> {
///     Err(TransportError::new(TransportErrorKind::Network("connection refused".into())))?
/// }
///
/// let err = post().unwrap_err();
/// assert!(!err.is_rate_limited());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("BotBlock Error: {}", _0)]
pub struct BotBlockError(Box<BotBlockErrorKind>);

impl BotBlockError {
    /// Create a new error from a kind.
    pub fn new(kind: BotBlockErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BotBlockErrorKind {
        &self.0
    }

    /// True when the API answered with HTTP 429.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind(), BotBlockErrorKind::RateLimited(_))
    }

    /// The rate limit metadata, when this is a rate limit.
    pub fn rate_limit(&self) -> Option<&RateLimitSignal> {
        match self.kind() {
            BotBlockErrorKind::RateLimited(err) => Some(&err.signal),
            _ => None,
        }
    }

    /// The per-destination rejections, when this is a partial failure.
    pub fn partial_failures(&self) -> Option<&[DestinationFailure]> {
        match self.kind() {
            BotBlockErrorKind::PartialFailure(err) => Some(&err.failures),
            _ => None,
        }
    }

    /// True when the error was raised before any network call.
    pub fn is_precondition(&self) -> bool {
        matches!(self.kind(), BotBlockErrorKind::Precondition(_))
    }
}

// Generic From implementation for any type that converts to BotBlockErrorKind
impl<T> From<T> for BotBlockError
where
    T: Into<BotBlockErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for BotBlock operations.
pub type BotBlockResult<T> = std::result::Result<T, BotBlockError>;
