//! Test utilities for BotBlock client tests.
//!
//! `MockTransport` answers from a script instead of the network and records
//! every request it receives.

#![allow(dead_code)]

use async_trait::async_trait;
use botblock_client::{ApiRequest, RawResponse, Transport};
use botblock_error::{TransportError, TransportErrorKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Respond with a status and body
    Reply(u16, String),
    /// Fail before a response arrives
    Fail(TransportErrorKind),
}

/// Scripted, counting transport. The last scripted answer repeats forever.
#[derive(Debug)]
pub struct MockTransport {
    script: Vec<MockResponse>,
    delay: Duration,
    calls: AtomicUsize,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Always answer `status` with `body`.
    pub fn reply(status: u16, body: &str) -> Arc<Self> {
        Self::script(vec![MockResponse::Reply(status, body.to_string())])
    }

    /// Always fail with `kind`.
    pub fn fail(kind: TransportErrorKind) -> Arc<Self> {
        Self::script(vec![MockResponse::Fail(kind)])
    }

    /// Answer from `script` in order.
    pub fn script(script: Vec<MockResponse>) -> Arc<Self> {
        Arc::new(Self::unshared(script, Duration::ZERO))
    }

    /// Like [`reply`](Self::reply), but every answer takes `delay`.
    pub fn slow_reply(status: u16, body: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::unshared(
            vec![MockResponse::Reply(status, body.to_string())],
            delay,
        ))
    }

    fn unshared(script: Vec<MockResponse>, delay: Duration) -> Self {
        assert!(!script.is_empty(), "script needs at least one answer");
        Self {
            script,
            delay,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of requests sent so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.script[call.min(self.script.len() - 1)] {
            MockResponse::Reply(status, body) => Ok(RawResponse::new(*status, body.clone(), None)),
            MockResponse::Fail(kind) => Err(TransportError::new(kind.clone())),
        }
    }
}

/// A count response where every site accepted the report.
pub const ACCEPTED: &str = r#"{"success": {"siteA": [200, "OK"]}, "failure": {}}"#;

/// The documented 429 body.
pub const RATE_LIMITED: &str =
    r#"{"retry_after": 30, "ratelimit_bot_id": "1", "ratelimit_ip": "2", "ratelimit_route": "/count"}"#;
