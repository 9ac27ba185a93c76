//! Time-bounded response cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A cached value and when it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    captured_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) < ttl
    }
}

/// Key/value store whose entries go stale after a fixed lifetime.
///
/// Stale entries are not evicted; they are ignored until overwritten.
/// Keys are opaque to the cache.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a cache with the given entry lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Get a fresh value for `key`.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Store `value`, replacing any previous entry and its timestamp.
    pub fn put(&self, key: impl Into<String>, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.into(),
                CacheEntry {
                    value,
                    captured_at: Instant::now(),
                },
            );
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
