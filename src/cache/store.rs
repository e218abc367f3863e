//! Object Cache Module
//!
//! In-memory map from string key to value with per-entry TTL. Expiry is
//! checked on every read; the periodic sweep only reclaims memory.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use crate::cache::lock::mutex_lock;
use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats};

const SOURCE: &str = "cache::store";

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
}

// == Object Cache ==
/// Process-wide object cache for upstream responses.
///
/// Every operation is synchronous and takes `&self`; share it behind an `Arc`.
#[derive(Debug)]
pub struct ObjectCache<V> {
    inner: Mutex<Inner<V>>,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl<V: Clone> ObjectCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for entries stored without an explicit one
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                stats: CacheStats::default(),
            }),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for the key.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses default_ttl if None)
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let mut inner = mutex_lock(&self.inner, SOURCE, "set");

        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "Object cache store");
        inner.entries.insert(key, CacheEntry::new(value, ttl));
        let len = inner.entries.len();
        inner.stats.set_total_entries(len);
    }

    // == Get ==
    /// Returns the value if present and fresh.
    ///
    /// A stale entry is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_ms())
    }

    pub(crate) fn get_at(&self, key: &str, now_ms: u64) -> Option<V> {
        let mut inner = mutex_lock(&self.inner, SOURCE, "get");

        let Some(fresh) = inner.entries.get(key).map(|entry| entry.is_fresh_at(now_ms)) else {
            inner.stats.record_miss();
            debug!(key, "Object cache miss");
            return None;
        };

        if !fresh {
            inner.entries.remove(key);
            let len = inner.entries.len();
            inner.stats.set_total_entries(len);
            inner.stats.record_expiration();
            debug!(key, "Object cache entry expired on read");
            return None;
        }

        inner.stats.record_hit();
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Returns true if a fresh entry exists. Removes a stale one.
    ///
    /// Does not count towards hit/miss statistics.
    pub fn has(&self, key: &str) -> bool {
        let now = current_timestamp_ms();
        let mut inner = mutex_lock(&self.inner, SOURCE, "has");

        match inner.entries.get(key).map(|entry| entry.is_fresh_at(now)) {
            Some(true) => true,
            Some(false) => {
                inner.entries.remove(key);
                let len = inner.entries.len();
                inner.stats.set_total_entries(len);
                inner.stats.expirations += 1;
                false
            }
            None => false,
        }
    }

    // == Remaining TTL ==
    /// Returns how long a fresh entry stays fresh, None if absent or stale.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let inner = mutex_lock(&self.inner, SOURCE, "ttl_remaining");
        inner
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.ttl_remaining())
    }

    // == Remove ==
    /// Removes an entry. Returns true if one was present.
    pub fn remove(&self, key: &str) -> bool {
        let mut inner = mutex_lock(&self.inner, SOURCE, "remove");
        let removed = inner.entries.remove(key).is_some();
        let len = inner.entries.len();
        inner.stats.set_total_entries(len);
        removed
    }

    // == Clear ==
    /// Drops every entry unconditionally.
    pub fn clear(&self) {
        let mut inner = mutex_lock(&self.inner, SOURCE, "clear");
        inner.entries.clear();
        inner.stats.set_total_entries(0);
    }

    // == Sweep ==
    /// Removes all stale entries.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(current_timestamp_ms())
    }

    pub(crate) fn sweep_at(&self, now_ms: u64) -> usize {
        let mut inner = mutex_lock(&self.inner, SOURCE, "sweep");
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.is_fresh_at(now_ms));
        let after = inner.entries.len();

        let removed = before - after;
        inner.stats.record_swept(removed);
        inner.stats.set_total_entries(after);
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = mutex_lock(&self.inner, SOURCE, "stats");
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    /// Number of entries, stale ones included until they are observed.
    pub fn len(&self) -> usize {
        mutex_lock(&self.inner, SOURCE, "len").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn cache() -> ObjectCache<String> {
        ObjectCache::new(Duration::from_secs(3600))
    }

    #[test]
    fn test_cache_new() {
        let cache = cache();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.default_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_set_and_get() {
        let cache = cache();

        cache.set("league:39", "Premier League".to_string(), None);

        assert_eq!(cache.get("league:39"), Some("Premier League".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let cache = cache();
        assert_eq!(cache.get("team:33"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_is_last_write_wins() {
        let cache = cache();

        cache.set("team:33", "v1".to_string(), None);
        cache.set("team:33", "v2".to_string(), Some(Duration::from_secs(5)));

        assert_eq!(cache.get("team:33"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_default_ttl_applied() {
        let cache: ObjectCache<u8> = ObjectCache::new(Duration::from_millis(30));
        cache.set("k", 1, None);
        assert!(cache.has("k"));

        sleep(Duration::from_millis(60));

        assert!(!cache.has("k"));
    }

    #[test]
    fn test_expire_on_read_removes_entry() {
        let cache = cache();
        cache.set("rounds:39:2024", "r".to_string(), Some(Duration::from_millis(30)));

        sleep(Duration::from_millis(60));

        // Still physically present until observed
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("rounds:39:2024"), None);
        assert_eq!(cache.len(), 0);

        let stats = cache.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_get_at_boundary() {
        let cache = cache();
        cache.set("k", "v".to_string(), Some(Duration::from_millis(1000)));
        let stored_at = current_timestamp_ms();

        // Entry was stored at or before `stored_at`, so `stored_at + 999` is inside the window
        assert!(cache.get_at("k", stored_at + 999).is_some());
        assert!(cache.get_at("k", stored_at + 60_000).is_none());
    }

    #[test]
    fn test_has_removes_stale_entry() {
        let cache = cache();
        cache.set("k", "v".to_string(), Some(Duration::from_millis(20)));
        assert!(cache.has("k"));

        sleep(Duration::from_millis(50));

        assert!(!cache.has("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove() {
        let cache = cache();
        cache.set("k", "v".to_string(), None);

        assert!(cache.remove("k"));
        assert!(!cache.remove("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = cache();
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_sweep_removes_only_stale() {
        let cache = cache();
        cache.set("short", "1".to_string(), Some(Duration::from_millis(20)));
        cache.set("long", "2".to_string(), Some(Duration::from_secs(60)));

        sleep(Duration::from_millis(50));

        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long"), Some("2".to_string()));
        assert_eq!(cache.stats().swept, 1);
    }

    #[test]
    fn test_sweep_at_future_instant() {
        let cache = cache();
        cache.set("a", "1".to_string(), Some(Duration::from_secs(10)));
        cache.set("b", "2".to_string(), Some(Duration::from_secs(100)));

        let later = current_timestamp_ms() + 50_000;
        assert_eq!(cache.sweep_at(later), 1);
        assert!(cache.has("b"));
    }

    #[test]
    fn test_ttl_remaining() {
        let cache = cache();
        cache.set("k", "v".to_string(), Some(Duration::from_secs(10)));

        let remaining = cache.ttl_remaining("k").unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
        assert!(cache.ttl_remaining("missing").is_none());
    }

    #[test]
    fn test_stats() {
        let cache = cache();

        cache.set("k", "v".to_string(), None);
        cache.get("k"); // hit
        cache.get("nope"); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
