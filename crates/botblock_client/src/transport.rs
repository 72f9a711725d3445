//! HTTP transport.

use crate::{ApiRequest, RawResponse};
use async_trait::async_trait;
use botblock_error::{BotBlockResult, TransportError, TransportErrorKind};
use botblock_rate_limit::retry_after_header;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::{debug, error, instrument};

/// Default API base URL.
pub const BASE_URL: &str = "https://botblock.org/api/";

/// Performs one API call.
///
/// Implementations must be safe to call concurrently. No retries: a failed call
/// is reported once.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `request` and return the response if its body is non-empty.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    user_agent: String,
}

impl ReqwestTransport {
    /// Create a transport sending `user_agent` on every call.
    ///
    /// A missing trailing slash on `base_url` is added so relative paths
    /// resolve under it.
    #[instrument(skip(user_agent))]
    pub fn new(base_url: &str, user_agent: impl Into<String>) -> BotBlockResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| {
            TransportError::new(TransportErrorKind::InvalidRequest(format!(
                "Invalid base URL {}: {}",
                normalized, e
            )))
        })?;

        debug!("Creating reqwest transport");
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            user_agent: user_agent.into(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// User-Agent sent with every call.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let url = self.base_url.join(request.path()).map_err(|e| {
            TransportError::new(TransportErrorKind::InvalidRequest(format!(
                "Invalid path {}: {}",
                request.path(),
                e
            )))
        })?;
        let timeout = *request.timeout();
        debug!(%url, ?timeout, "Sending request");

        let mut builder = self
            .client
            .request((*request.method()).into(), url)
            .timeout(timeout)
            .header(USER_AGENT, &self.user_agent);
        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "Request failed");
            request_error(&e, timeout.as_secs())
        })?;

        let status_code = response.status().as_u16();
        let retry_after = retry_after_header(response.headers());
        let body = response.text().await.map_err(|e| {
            error!(status_code, error = %e, "Failed to read response body");
            request_error(&e, timeout.as_secs())
        })?;

        if body.trim().is_empty() {
            error!(status_code, "Received empty response from BotBlock API");
            return Err(TransportError::new(TransportErrorKind::EmptyBody {
                status_code,
            }));
        }

        debug!(status_code, body_len = body.len(), "Response received");
        Ok(RawResponse::new(status_code, body, retry_after))
    }
}

#[track_caller]
fn request_error(e: &reqwest::Error, timeout_secs: u64) -> TransportError {
    let kind = if e.is_timeout() {
        TransportErrorKind::Timeout(timeout_secs)
    } else if e.is_builder() {
        TransportErrorKind::InvalidRequest(e.to_string())
    } else {
        TransportErrorKind::Network(e.to_string())
    };
    TransportError::new(kind)
}
