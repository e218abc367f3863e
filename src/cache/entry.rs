//! Cache Entry Module
//!
//! Defines the structure for individual object cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached value with the time it was stored and how long it stays fresh.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Store timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Time-to-live from `stored_at`
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stored now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: current_timestamp_ms(),
            ttl,
        }
    }

    // == Freshness ==
    /// Checks whether the entry is still fresh at `now_ms`.
    ///
    /// Boundary condition: an entry whose age equals its TTL exactly is still
    /// fresh; it becomes stale one millisecond later.
    pub fn is_fresh_at(&self, now_ms: u64) -> bool {
        is_fresh(self.stored_at, self.ttl, now_ms)
    }

    /// Checks whether the entry is still fresh right now.
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns the remaining freshness window, zero once stale.
    pub fn ttl_remaining(&self) -> Duration {
        let age = current_timestamp_ms().saturating_sub(self.stored_at);
        self.ttl.saturating_sub(Duration::from_millis(age))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as zero.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Shared freshness rule: `now - stored_at <= ttl`.
///
/// A `stored_at` in the future (clock moved backwards) counts as age zero.
pub fn is_fresh(stored_at: u64, ttl: Duration, now_ms: u64) -> bool {
    let age = now_ms.saturating_sub(stored_at);
    u128::from(age) <= ttl.as_millis()
}
