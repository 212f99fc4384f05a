//! Call strategies - policies for converting a possibly-failing upstream call
//! into a (usually) successful result.
//!
//! Four interchangeable strategies:
//! - `Baseline`: one raw call, fails under upstream concurrency pressure
//! - `CacheFallback`: serve the last known-good response when a call fails
//! - `BackoffRetry`: re-randomized sleep between retries until success
//! - `TimeGatedThrottle`: space calls out by tracking the last request time
//!
//! Every strategy except `Baseline` loops until it observes a success; there
//! is no attempt cap and no cancellation input. A persistently failing
//! upstream blocks the invoking slot indefinitely.

pub mod backoff;
pub mod baseline;
pub mod cache_fallback;
pub mod throttle;

pub use backoff::BackoffRetry;
pub use baseline::Baseline;
pub use cache_fallback::CacheFallback;
pub use throttle::TimeGatedThrottle;

use async_trait::async_trait;

use crate::upstream::CallResult;

/// One policy for calling the upstream.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Name the harness resolves this strategy by.
    fn name(&self) -> &'static str;

    /// Invoke the upstream under this strategy's recovery policy.
    async fn invoke(&self) -> CallResult;
}
