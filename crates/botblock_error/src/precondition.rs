//! Precondition errors raised before any network call is attempted.

/// A caller-supplied argument violated a precondition (empty id, no tokens, ...).
///
/// These are never retried; they indicate a programming or configuration mistake.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Precondition Failed: {} at line {} in {}", message, line, file)]
pub struct PreconditionError {
    /// Description of the violated precondition
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl PreconditionError {
    /// Create a new PreconditionError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use botblock_error::PreconditionError;
    ///
    /// let err = PreconditionError::new("Tokens may not be empty.");
    /// assert!(err.to_string().contains("Tokens may not be empty."));
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

    /// Fail with `"<name> may not be empty."` when `value` is empty.
    #[track_caller]
    pub fn check_not_empty(value: &str, name: &str) -> Result<(), Self> {
        if value.is_empty() {
            return Err(Self::new(format!("{} may not be empty.", name)));
        }
        Ok(())
    }

    /// Fail with `message` when `violated` is true.
    #[track_caller]
    pub fn check(violated: bool, message: impl Into<String>) -> Result<(), Self> {
        if violated {
            return Err(Self::new(message));
        }
        Ok(())
    }
}
