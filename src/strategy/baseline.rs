//! Baseline strategy - a single unprotected call.

use std::sync::Arc;

use async_trait::async_trait;

use crate::strategy::Strategy;
use crate::upstream::{self, CallResult, UpstreamClient};

/// Passes the call straight through. No retry, no caching; the only strategy
/// that can hand a failing result back to the harness.
pub struct Baseline {
    upstream: Arc<dyn UpstreamClient>,
}

impl Baseline {
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl Strategy for Baseline {
    fn name(&self) -> &'static str {
        "baseline"
    }

    async fn invoke(&self) -> CallResult {
        tracing::debug!("baseline");
        upstream::call(&*self.upstream).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::MockUpstream;

    #[tokio::test]
    async fn test_success_passes_through() {
        let upstream = Arc::new(MockUpstream::new(vec![]));
        let strategy = Baseline::new(upstream.clone());

        let result = strategy.invoke().await;
        assert!(result.success);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_passes_through_without_retry() {
        let upstream = Arc::new(MockUpstream::fail_first(1));
        let strategy = Baseline::new(upstream.clone());

        let result = strategy.invoke().await;
        assert!(!result.success);
        assert!(result.is_upstream_failure());
        assert_eq!(upstream.calls(), 1);
    }

    #[test]
    fn test_name() {
        let upstream = Arc::new(MockUpstream::new(vec![]));
        assert_eq!(Baseline::new(upstream).name(), "baseline");
    }
}
