//! Errors raised while building or loading a client configuration.

/// A configuration source could not be read, parsed or deserialized.
///
/// Raised by the layered loader (bundled defaults, user files, `BOTBLOCK_*`
/// variables) and by the config builder when a required field is missing.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Which source failed and why
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Record a loading failure at the caller's location.
    ///
    /// ```
    /// use botblock_error::{BotBlockError, BotBlockErrorKind, ConfigError};
    ///
    /// let err: BotBlockError =
    ///     ConfigError::new("Failed to parse configuration: invalid type for `tokens`").into();
    /// assert!(matches!(err.kind(), BotBlockErrorKind::Config(_)));
    /// assert!(err.to_string().contains("`tokens`"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
