//! Cache Statistics Module
//!
//! Counters behind the `objects` section of `GET /cache/stats`.

use serde::Serialize;

// == Cache Stats ==
/// Object cache counters, snapshotted by [`ObjectCache::stats`](super::ObjectCache::stats).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    /// Reads served without touching the upstream
    pub hits: u64,
    /// Reads that had to go upstream, expired entries included
    pub misses: u64,
    pub expirations: u64,
    pub swept: u64,
    pub total_entries: usize,
}

impl CacheStats {
    /// Share of reads the upstream was spared; 0.0 before the first read.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts a stale entry removed by `get`/`has`. Also a miss.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }

    pub fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
