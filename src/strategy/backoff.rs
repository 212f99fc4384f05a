//! Backoff-retry strategy - randomized sleep between retries.
//!
//! The delay is re-randomized within fixed bounds on every attempt, with no
//! exponential growth. Spreading retries in time keeps many concurrent
//! callers' retries from colliding and re-tripping the upstream's ceiling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;

use crate::config::BackoffConfig;
use crate::strategy::Strategy;
use crate::upstream::{self, CallResult, UpstreamClient};

/// Calls once, then sleeps a random bounded delay before each retry until a
/// success is observed.
pub struct BackoffRetry {
    upstream: Arc<dyn UpstreamClient>,
    config: BackoffConfig,
}

impl BackoffRetry {
    pub fn new(upstream: Arc<dyn UpstreamClient>, config: BackoffConfig) -> Self {
        Self { upstream, config }
    }

    /// Uniform random delay within the configured bounds, inclusive.
    fn sample_delay(&self) -> Duration {
        let mut rng = rand::rng();
        let micros = rng.random_range(self.config.min_delay_us..=self.config.max_delay_us);
        Duration::from_micros(micros)
    }
}

#[async_trait]
impl Strategy for BackoffRetry {
    fn name(&self) -> &'static str {
        "backoff"
    }

    async fn invoke(&self) -> CallResult {
        tracing::debug!("backoff");

        let mut result = upstream::call(&*self.upstream).await;

        if !result.success {
            tracing::debug!("response failed!");
            let mut attempt = 0u32;
            while !result.success {
                let delay = self.sample_delay();
                tracing::debug!(attempt, delay_us = delay.as_micros() as u64, "retrying after backoff");
                sleep(delay).await;
                result = upstream::call(&*self.upstream).await;
                attempt += 1;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::MockUpstream;

    #[tokio::test]
    async fn test_success_on_first_call_skips_retry_loop() {
        let upstream = Arc::new(MockUpstream::new(vec![]));
        let strategy = BackoffRetry::new(upstream.clone(), BackoffConfig::default());

        let result = strategy.invoke().await;
        assert!(result.success);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let upstream = Arc::new(MockUpstream::fail_first(5));
        let strategy = BackoffRetry::new(upstream.clone(), BackoffConfig::default());

        let result = strategy.invoke().await;
        assert!(result.success);
        assert_eq!(upstream.calls(), 6);
    }

    #[tokio::test]
    async fn test_transport_failures_are_retried_too() {
        use crate::error::ShieldrError;

        let upstream = Arc::new(MockUpstream::new(vec![
            Err(ShieldrError::Transport("connection refused".to_string())),
            Err(ShieldrError::Transport("connection refused".to_string())),
        ]));
        let strategy = BackoffRetry::new(upstream.clone(), BackoffConfig::default());

        let result = strategy.invoke().await;
        assert!(result.success);
        assert_eq!(upstream.calls(), 3);
    }

    #[test]
    fn test_sampled_delay_stays_within_bounds() {
        let upstream = Arc::new(MockUpstream::new(vec![]));
        let config = BackoffConfig {
            min_delay_us: 10,
            max_delay_us: 30,
        };
        let strategy = BackoffRetry::new(upstream, config.clone());

        for _ in 0..200 {
            let delay = strategy.sample_delay();
            assert!(delay >= config.min_delay());
            assert!(delay <= config.max_delay());
        }
    }

    #[test]
    fn test_degenerate_bounds_sample_exactly() {
        let upstream = Arc::new(MockUpstream::new(vec![]));
        let config = BackoffConfig {
            min_delay_us: 20,
            max_delay_us: 20,
        };
        let strategy = BackoffRetry::new(upstream, config);

        assert_eq!(strategy.sample_delay(), Duration::from_micros(20));
    }
}
