//! Per-destination rejections reported inside an otherwise successful response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One destination site that rejected the report.
///
/// `status` and `message` are `None` when the API sent something other than a
/// `[code, "message"]` pair for this site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DestinationFailure {
    /// Destination site name as sent by the API
    pub site: String,
    /// Status code the destination answered with
    pub status: Option<i64>,
    /// Message the destination answered with
    pub message: Option<String>,
}

impl DestinationFailure {
    /// A failure whose code and message are both known.
    pub fn new(site: impl Into<String>, status: i64, message: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            status: Some(status),
            message: Some(message.into()),
        }
    }

    /// A failure whose details could not be read.
    pub fn unknown(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            status: None,
            message: None,
        }
    }
}

impl fmt::Display for DestinationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.message) {
            (Some(status), Some(message)) => write!(f, "{} ({}: {})", self.site, status, message),
            _ => write!(f, "{} (?: ?)", self.site),
        }
    }
}

/// The broker accepted the batch but one or more destinations rejected it.
///
/// # Examples
///
/// ```
/// use botblock_error::{DestinationFailure, PartialFailureError};
///
/// let err = PartialFailureError::new(vec![DestinationFailure::new("siteA", 404, "not found")]);
/// assert_eq!(err.failures.len(), 1);
/// assert!(err.to_string().contains("siteA (404: not found)"));
/// ```
#[derive(Debug, Clone, derive_more::Error)]
pub struct PartialFailureError {
    /// Rejections, ordered by site name
    pub failures: Vec<DestinationFailure>,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PartialFailureError {
    /// Create a new PartialFailureError with automatic location tracking.
    #[track_caller]
    pub fn new(mut failures: Vec<DestinationFailure>) -> Self {
        failures.sort();
        let location = std::panic::Location::caller();
        Self {
            failures,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Look up the rejection reported for `site`.
    pub fn failure_for(&self, site: &str) -> Option<&DestinationFailure> {
        self.failures.iter().find(|f| f.site == site)
    }
}

impl fmt::Display for PartialFailureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Partial Failure: {} destination(s) rejected the report: ",
            self.failures.len()
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", failure)?;
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
