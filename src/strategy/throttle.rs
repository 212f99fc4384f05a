//! Time-gated throttle strategy - space requests out in time.
//!
//! Better suited to upstreams that limit by request rate than by concurrency:
//! tune tolerance and delay so the spacing between calls never violates the
//! limit.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::config::ThrottleConfig;
use crate::mark::LastRequestMark;
use crate::strategy::Strategy;
use crate::upstream::{self, CallResult, UpstreamClient};

/// Only calls when enough time has passed since the last recorded request;
/// otherwise sleeps a fixed delay and calls anyway. The delay is applied once
/// per attempt, never re-checked against the tolerance.
pub struct TimeGatedThrottle {
    upstream: Arc<dyn UpstreamClient>,
    mark: Arc<LastRequestMark>,
    config: ThrottleConfig,
}

impl TimeGatedThrottle {
    pub fn new(upstream: Arc<dyn UpstreamClient>, mark: Arc<LastRequestMark>, config: ThrottleConfig) -> Self {
        Self { upstream, mark, config }
    }
}

#[async_trait]
impl Strategy for TimeGatedThrottle {
    fn name(&self) -> &'static str {
        "throttle"
    }

    async fn invoke(&self) -> CallResult {
        tracing::debug!("throttle");

        loop {
            match self.mark.elapsed() {
                Some(elapsed) if elapsed > self.config.tolerance() => {
                    tracing::debug!(elapsed_us = elapsed.as_micros() as u64, "tolerance passed, calling now");
                }
                Some(elapsed) => {
                    tracing::debug!(elapsed_us = elapsed.as_micros() as u64, "under tolerance, delaying the call");
                    sleep(self.config.sleep_delay()).await;
                }
                None => {
                    tracing::debug!("no request on record, calling now");
                }
            }

            let result = upstream::call(&*self.upstream).await;
            // Mark after every attempt, success or failure
            self.mark.record_now();

            if result.success {
                tracing::debug!("successful request");
                return result;
            }
            tracing::warn!("request failed, trying again");
        }
    }
}
