//! Concurrent test harness.
//!
//! Fires N simultaneous calls through one strategy and reports per-call
//! success/failure. Provoking the upstream's concurrency ceiling is the whole
//! point: attempts defaults to 15 against an assumed ceiling of 10.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::cache::ResponseCache;
use crate::classify;
use crate::config::Config;
use crate::mark::LastRequestMark;
use crate::strategy::{BackoffRetry, Baseline, CacheFallback, Strategy, TimeGatedThrottle};
use crate::upstream::{self, UpstreamClient};

/// One attempt's result as shown in the report.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    /// Launch index of the attempt. Results arrive in completion order, so
    /// indices in the report are not sorted.
    pub index: usize,
    pub body: String,
    /// Re-classified from the body, independent of the strategy's own verdict.
    pub failed: bool,
}

/// Aggregate of one harness run. Built once, immutable after construction.
#[derive(Debug)]
pub struct HarnessReport {
    /// Strategy name the run was requested with.
    pub strategy: String,
    /// What actually handled the calls: a strategy, or the raw upstream URL.
    pub target: String,
    pub results: Vec<AttemptOutcome>,
    pub total: usize,
    pub failures: usize,
}

/// Driver that owns the upstream handle and the strategies' shared state.
///
/// The cache and the last-request mark live here, injected into strategies by
/// reference, so every slot of a run (and successive runs) observes the same
/// single-slot state.
pub struct Harness {
    upstream: Arc<dyn UpstreamClient>,
    cache: Arc<ResponseCache>,
    mark: Arc<LastRequestMark>,
    config: Config,
}

impl Harness {
    pub fn new(upstream: Arc<dyn UpstreamClient>, config: Config) -> Self {
        Self {
            upstream,
            cache: Arc::new(ResponseCache::new(config.cache.ttl())),
            mark: Arc::new(LastRequestMark::new()),
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn mark(&self) -> &Arc<LastRequestMark> {
        &self.mark
    }

    /// Resolve a strategy by name. Unrecognized names resolve to None and the
    /// harness calls the raw upstream instead.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        match name {
            "baseline" => Some(Arc::new(Baseline::new(self.upstream.clone()))),
            "cache-fallback" => Some(Arc::new(CacheFallback::new(
                self.upstream.clone(),
                self.cache.clone(),
            ))),
            "backoff" => Some(Arc::new(BackoffRetry::new(
                self.upstream.clone(),
                self.config.backoff.clone(),
            ))),
            "throttle" => Some(Arc::new(TimeGatedThrottle::new(
                self.upstream.clone(),
                self.mark.clone(),
                self.config.throttle.clone(),
            ))),
            _ => None,
        }
    }

    /// Fire `attempts` concurrent invocations of the named strategy and block
    /// until all complete. Results are collected in completion order.
    pub async fn run(&self, strategy_name: &str, attempts: usize) -> HarnessReport {
        tracing::debug!(strategy = strategy_name, attempts, "test");

        let strategy = self.resolve(strategy_name);
        let target = match &strategy {
            Some(s) => s.name().to_string(),
            None => {
                tracing::warn!(strategy = strategy_name, "unknown strategy, calling the upstream directly");
                self.upstream.url().to_string()
            }
        };

        let mut tasks = FuturesUnordered::new();
        for index in 0..attempts {
            match &strategy {
                Some(s) => {
                    let s = Arc::clone(s);
                    tasks.push(tokio::spawn(async move { (index, s.invoke().await) }));
                }
                None => {
                    let upstream = Arc::clone(&self.upstream);
                    tasks.push(tokio::spawn(async move {
                        (index, upstream::call(&*upstream).await)
                    }));
                }
            }
        }

        let mut results = Vec::with_capacity(attempts);
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok((index, result)) => {
                    let failed = classify::is_failure(&result.body);
                    tracing::debug!(index, failed, "attempt finished: {}", result.body);
                    results.push(AttemptOutcome {
                        index,
                        body: result.body,
                        failed,
                    });
                }
                Err(e) => {
                    tracing::error!("harness task failed to join: {}", e);
                }
            }
        }

        let failures = results.iter().filter(|r| r.failed).count();
        HarnessReport {
            strategy: strategy_name.to_string(),
            target,
            total: results.len(),
            failures,
            results,
        }
    }
}
