//! Transport-level error types.

/// Transport-level failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransportErrorKind {
    /// The request could not be built (bad base URL, bad header value)
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Connection, DNS or I/O failure before a response arrived
    #[display("Request failed: {}", _0)]
    Network(String),
    /// The per-call timeout elapsed
    #[display("Request timed out after {} seconds", _0)]
    Timeout(u64),
    /// The API answered with an empty or absent body
    #[display("Received empty response from BotBlock API (HTTP {})", status_code)]
    EmptyBody {
        /// HTTP status code of the empty response
        status_code: u16,
    },
    /// The API answered with a non-2xx, non-429 status
    #[display("The API responded with error code {} ({})", status_code, message)]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Server-supplied message or canonical reason phrase
        message: String,
    },
}

impl TransportErrorKind {
    /// HTTP status code carried by this failure, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportErrorKind::EmptyBody { status_code }
            | TransportErrorKind::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Transport error with source location tracking.
///
/// # Examples
///
/// ```
/// use botblock_error::{TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::EmptyBody { status_code: 200 });
/// assert!(err.to_string().contains("empty response"));
/// assert_eq!(err.kind.status_code(), Some(200));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The kind of error that occurred
    pub kind: TransportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TransportError {
    /// Create a new TransportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
