//! Cache-fallback strategy - serve the last known-good response on failure.
//!
//! Biases availability over freshness: a stale body beats failing the caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::ResponseCache;
use crate::strategy::Strategy;
use crate::upstream::{self, CallResult, UpstreamClient};

/// Retries the upstream, storing every success in the cache and serving the
/// cached value when a call fails. With a failing upstream and an empty cache
/// this spins without sleeping until a live call succeeds.
pub struct CacheFallback {
    upstream: Arc<dyn UpstreamClient>,
    cache: Arc<ResponseCache>,
}

impl CacheFallback {
    pub fn new(upstream: Arc<dyn UpstreamClient>, cache: Arc<ResponseCache>) -> Self {
        Self { upstream, cache }
    }
}

#[async_trait]
impl Strategy for CacheFallback {
    fn name(&self) -> &'static str {
        "cache-fallback"
    }

    async fn invoke(&self) -> CallResult {
        tracing::debug!("cache-fallback");

        loop {
            let result = upstream::call(&*self.upstream).await;

            if result.success {
                self.cache.put(result.body.clone());
                return result;
            }

            // Serve the cached value as if it were a fresh success. The entry
            // may be past its TTL; staleness is tolerated here.
            if let Some(value) = self.cache.get() {
                if self.cache.is_expired() {
                    tracing::debug!("serving cached response past its TTL");
                }
                return CallResult::from_body(value);
            }

            tracing::error!("No valid response in the cache.");
            // back to the top and try again
        }
    }
}
