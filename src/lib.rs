//! shieldr - strategies for shielding clients from upstream concurrency limits
//!
//! Four call strategies (baseline passthrough, cache-fallback, randomized
//! backoff retry, time-gated throttle) wrapped around one flaky HTTP upstream,
//! plus a harness that fires concurrent calls through a chosen strategy and
//! reports per-call success/failure.

pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod harness;
pub mod mark;
pub mod strategy;
pub mod upstream;

pub use error::{Result, ShieldrError};
