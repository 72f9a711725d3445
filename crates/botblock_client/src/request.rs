//! Request and response values exchanged with a [`Transport`](crate::Transport).

use botblock_error::{BotBlockResult, PreconditionError};
use botblock_rate_limit::{Classification, classify};
use derive_getters::Getters;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::time::Duration;

/// Timeout for every GET.
pub const GET_TIMEOUT: Duration = Duration::from_secs(10);

/// POST timeout granted per destination the report fans out to.
pub const POST_TIMEOUT_PER_DESTINATION: Duration = Duration::from_secs(10);

/// HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// Read routes
    Get,
    /// `count`
    Post,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// One outbound API call.
///
/// `path` is relative to the API base URL, e.g. `bots/1234` or `lists?filter=true`.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<String>,
    timeout: Duration,
}

impl ApiRequest {
    /// GET with the fixed read timeout.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            timeout: GET_TIMEOUT,
        }
    }

    /// POST a JSON body, scaling the timeout with the number of destinations.
    pub fn post(path: impl Into<String>, body: impl Into<String>, destinations: usize) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body.into()),
            timeout: post_timeout(destinations),
        }
    }
}

/// Everything except RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode `value` as one path segment so `/`, `?` and `#` cannot change the route.
///
/// ```
/// use botblock_client::path_segment;
///
/// assert_eq!(path_segment("1234", "ID").unwrap(), "1234");
/// assert_eq!(path_segment("../lists", "ID").unwrap(), "..%2Flists");
/// assert!(path_segment("..", "ID").is_err());
/// ```
///
/// # Errors
///
/// Fails if `value` is empty, or is `.` or `..`, which resolve as dot
/// segments even when encoded.
pub fn path_segment(value: &str, name: &str) -> BotBlockResult<String> {
    PreconditionError::check_not_empty(value, name)?;
    PreconditionError::check(
        value == "." || value == "..",
        format!("{} may not be a dot segment.", name),
    )?;
    Ok(utf8_percent_encode(value, PATH_SEGMENT).to_string())
}

/// `10 s × max(1, destinations)`.
pub fn post_timeout(destinations: usize) -> Duration {
    let destinations = u32::try_from(destinations.max(1)).unwrap_or(u32::MAX);
    POST_TIMEOUT_PER_DESTINATION.saturating_mul(destinations)
}

/// A response with a non-empty body.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RawResponse {
    status_code: u16,
    body: String,
    retry_after: Option<u64>,
}

impl RawResponse {
    /// Create a response. `retry_after` is the numeric `Retry-After` header, if any.
    pub fn new(status_code: u16, body: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self {
            status_code,
            body: body.into(),
            retry_after,
        }
    }

    /// Classify by status, falling back to the header for the retry delay.
    pub fn classify(&self) -> Classification {
        classify(self.status_code, &self.body).with_retry_after_header(self.retry_after)
    }
}
