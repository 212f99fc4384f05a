//! Single-slot response cache.
//!
//! Holds the last known-good upstream response so the cache-fallback strategy
//! can serve stale data instead of failing the caller. The TTL is advisory
//! metadata: `get` serves entries past it, and `is_expired` exists only for
//! observability.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// The last known-good response plus when it was stored.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub value: String,
    pub stored_at: Instant,
}

/// Time-expiring store of at most one response.
///
/// Concurrent writers race after their own successful call; last-writer-wins.
#[derive(Debug)]
pub struct ResponseCache {
    entry: Mutex<Option<CachedEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl,
        }
    }

    /// Store a value with the current timestamp, replacing any prior entry.
    pub fn put(&self, value: String) {
        let mut entry = self.entry.lock().unwrap();
        *entry = Some(CachedEntry {
            value,
            stored_at: Instant::now(),
        });
    }

    /// Return the stored value if present. The TTL is not checked here.
    pub fn get(&self) -> Option<String> {
        self.entry.lock().unwrap().as_ref().map(|e| e.value.clone())
    }

    pub fn has_value(&self) -> bool {
        self.entry.lock().unwrap().is_some()
    }

    /// Age of the current entry, if any.
    pub fn age(&self) -> Option<Duration> {
        self.entry.lock().unwrap().as_ref().map(|e| e.stored_at.elapsed())
    }

    /// Whether the current entry is past its TTL. Reported for logging; stale
    /// entries are still served by `get`.
    pub fn is_expired(&self) -> bool {
        self.age().map(|age| age > self.ttl).unwrap_or(false)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_cache_is_empty() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        assert!(!cache.has_value());
        assert!(cache.get().is_none());
        assert!(cache.age().is_none());
        assert!(!cache.is_expired());
    }

    #[test]
    fn test_put_then_get() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("response".to_string());
        assert!(cache.has_value());
        assert_eq!(cache.get().unwrap(), "response");
    }

    #[test]
    fn test_put_overwrites_prior_entry() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("first".to_string());
        cache.put("second".to_string());
        assert_eq!(cache.get().unwrap(), "second");
    }

    #[test]
    fn test_get_serves_entry_past_ttl() {
        // Chosen behavior: TTL is advisory, reads never expire the entry.
        let cache = ResponseCache::new(Duration::from_millis(5));
        cache.put("stale".to_string());

        thread::sleep(Duration::from_millis(15));

        assert!(cache.is_expired());
        assert_eq!(cache.get().unwrap(), "stale");
        assert!(cache.has_value());
    }

    #[test]
    fn test_age_grows() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("value".to_string());
        thread::sleep(Duration::from_millis(10));
        assert!(cache.age().unwrap() >= Duration::from_millis(10));
        assert!(!cache.is_expired());
    }
}
