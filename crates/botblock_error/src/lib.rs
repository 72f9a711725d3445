//! Error types for the BotBlock client.
//!
//! This crate provides the foundation error types used throughout the workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The top-level [`BotBlockError`] covers the whole taxonomy a caller can see:
//! precondition failures raised before any I/O, transport failures, rate limits,
//! per-destination partial failures, malformed JSON, configuration and scheduler
//! errors.
//!
//! # Examples
//!
//! ```
//! use botblock_error::{BotBlockResult, PreconditionError};
//!
//! fn check_id(id: &str) -> BotBlockResult<()> {
//!     if id.is_empty() {
//!         Err(PreconditionError::new("ID may not be empty."))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_id("").is_err());
//! assert!(check_id("1234").is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod partial_failure;
mod precondition;
mod rate_limited;
mod scheduler;
mod transport;

pub use config::ConfigError;
pub use error::{BotBlockError, BotBlockErrorKind, BotBlockResult};
pub use json::JsonError;
pub use partial_failure::{DestinationFailure, PartialFailureError};
pub use precondition::PreconditionError;
pub use rate_limited::{RateLimitSignal, RateLimitedError, UNKNOWN};
pub use scheduler::{SchedulerError, SchedulerErrorKind};
pub use transport::{TransportError, TransportErrorKind};
