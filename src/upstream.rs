//! Remote caller for the upstream service.
//!
//! One blocking GET per call, no retry. Retry and recovery are policy decisions
//! owned by the strategies, never by this layer.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;

use crate::classify;
use crate::config::UpstreamConfig;
use crate::error::{Result, ShieldrError};

/// A single call against the upstream endpoint.
///
/// Implementations must be safe to invoke concurrently from many logical
/// callers.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetch the raw response body, or fail with a transport error.
    async fn fetch(&self) -> Result<String>;

    /// The endpoint this client targets, for reporting.
    fn url(&self) -> &str;
}

/// Outcome of one upstream call after classification.
///
/// `error` is set only when the call physically did not complete, which keeps
/// "upstream said failure" distinguishable from "call never happened".
#[derive(Debug, Clone)]
pub struct CallResult {
    pub body: String,
    pub success: bool,
    pub error: Option<String>,
}

impl CallResult {
    /// Classify a well-transported body.
    pub fn from_body(body: String) -> Self {
        let success = !classify::is_failure(&body);
        Self {
            body,
            success,
            error: None,
        }
    }

    /// Record a call that never completed.
    pub fn transport(err: &ShieldrError) -> Self {
        Self {
            body: String::new(),
            success: false,
            error: Some(err.to_string()),
        }
    }

    /// The body transported fine but reported failure.
    pub fn is_upstream_failure(&self) -> bool {
        !self.success && self.error.is_none()
    }

    /// The call did not complete at the transport layer.
    pub fn is_transport_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// One call composed with classification.
///
/// Transport errors are logged here, at the caller boundary, and surfaced as a
/// failed result rather than being swallowed.
pub async fn call(upstream: &dyn UpstreamClient) -> CallResult {
    match upstream.fetch().await {
        Ok(body) => CallResult::from_body(body),
        Err(e) => {
            tracing::error!(url = upstream.url(), "upstream call failed: {}", e);
            CallResult::transport(&e)
        }
    }
}

/// HTTP client for the real upstream endpoint.
pub struct HttpUpstream {
    client: Client,
    url: String,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ShieldrError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ShieldrError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShieldrError::Transport(format!("Upstream returned {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| ShieldrError::Transport(format!("Failed to read body: {}", e)))
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for HttpUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUpstream").field("url", &self.url).finish()
    }
}

/// Scripted upstream for tests.
///
/// Pops queued outcomes in order, then keeps returning the default body once
/// the script is exhausted. Counts every fetch.
pub struct MockUpstream {
    script: Mutex<VecDeque<Result<String>>>,
    default_body: String,
    calls: AtomicUsize,
}

impl MockUpstream {
    pub fn new(script: Vec<Result<String>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            default_body: r#"{"success":1,"message":"Hello"}"#.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock whose first `n` fetches report upstream failure, mimicking a
    /// service with a concurrency ceiling already saturated by `n` callers.
    pub fn fail_first(n: usize) -> Self {
        let script = (0..n)
            .map(|_| Ok(r#"{"success":0,"message":"Request rejected"}"#.to_string()))
            .collect();
        Self::new(script)
    }

    pub fn with_default_body(mut self, body: impl Into<String>) -> Self {
        self.default_body = body.into();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for MockUpstream {
    async fn fetch(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome,
            None => Ok(self.default_body.clone()),
        }
    }

    fn url(&self) -> &str {
        "mock://upstream"
    }
}
