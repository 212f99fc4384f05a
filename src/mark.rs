//! Last-request mark for the time-gated throttle.
//!
//! A single mutable slot recording when the last outbound call was issued.
//! Concurrent strategy slots race to update it; last-writer-wins, same as the
//! response cache.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// When the last outbound request was made (None = no request on record).
#[derive(Debug, Default)]
pub struct LastRequestMark {
    inner: Mutex<Option<Instant>>,
}

impl LastRequestMark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a request was just issued.
    pub fn record_now(&self) {
        let mut mark = self.inner.lock().unwrap();
        *mark = Some(Instant::now());
    }

    /// Time since the last recorded request, if any.
    pub fn elapsed(&self) -> Option<Duration> {
        self.inner.lock().unwrap().map(|t| t.elapsed())
    }

    pub fn is_set(&self) -> bool {
        self.inner.lock().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_mark_is_unset() {
        let mark = LastRequestMark::new();
        assert!(!mark.is_set());
        assert!(mark.elapsed().is_none());
    }

    #[test]
    fn test_record_then_elapsed() {
        let mark = LastRequestMark::new();
        mark.record_now();
        assert!(mark.is_set());

        thread::sleep(Duration::from_millis(10));
        assert!(mark.elapsed().unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn test_record_overwrites() {
        let mark = LastRequestMark::new();
        mark.record_now();
        thread::sleep(Duration::from_millis(10));

        mark.record_now();
        assert!(mark.elapsed().unwrap() < Duration::from_millis(10));
    }
}
