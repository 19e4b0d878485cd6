//! Time-bounded result cache
//!
//! Memoizes recent catalog lookups so re-scanning the same card does not
//! re-query the collaborator. An explicit keyed store with a TTL check; no
//! hidden process-wide state.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Key-value cache where entries expire after a fixed time-to-live
///
/// Reads treat expired entries as absent and evict them; writes overwrite
/// unconditionally. The single mutex makes each read-then-write atomic per
/// key for concurrent callers.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a key, returning the value only if it is still fresh
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                debug!(key, "cache entry expired");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or refresh an entry
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.lock();
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of entries, including any not yet evicted by a TTL check
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("lightning bolt", 42u32);
        assert_eq!(cache.get("lightning bolt"), Some(42));
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("lightning bolt", 42u32);
        assert_eq!(cache.get("lightning bolt"), None);
        // The expired entry was evicted by the read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_overwrite_refreshes_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("key", 1u32);
        cache.insert("key", 2u32);
        assert_eq!(cache.get("key"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1u32);
        cache.insert("b", 2u32);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("unknown"), None);
    }
}
