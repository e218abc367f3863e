//! Response DTOs for the maintenance API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::time::Duration;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::media::MediaCacheStats;

/// Object cache counters (part of GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct ObjectStatsResponse {
    pub hits: u64,
    pub misses: u64,
    /// Stale entries dropped on read
    pub expirations: u64,
    /// Stale entries dropped by sweeps
    pub swept: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Upstream fetches currently in flight
    pub in_flight: usize,
}

impl ObjectStatsResponse {
    pub fn new(stats: &CacheStats, in_flight: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            swept: stats.swept,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            in_flight,
        }
    }
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub objects: ObjectStatsResponse,
    pub icons: MediaCacheStats,
    pub images: MediaCacheStats,
}

/// Response body for sweep and cleanup actions
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    /// Cache the action ran on
    pub cache: String,
    /// Number of stale entries removed
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(cache: impl Into<String>, removed: usize) -> Self {
        Self {
            cache: cache.into(),
            removed,
        }
    }
}

/// Response body for clear and remove actions
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    pub cache: String,
}

impl ClearResponse {
    pub fn cleared(cache: impl Into<String>) -> Self {
        let cache = cache.into();
        Self {
            message: format!("Cache '{}' cleared", cache),
            cache,
        }
    }

    pub fn removed(cache: impl Into<String>, key: &str) -> Self {
        let cache = cache.into();
        Self {
            message: format!("Key '{}' removed from '{}'", key, cache),
            cache,
        }
    }
}

/// Response body for GET /cache/keys/:key
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatusResponse {
    pub key: String,
    /// A fresh entry exists
    pub fresh: bool,
    /// Remaining lifetime of the fresh entry
    pub ttl_remaining_ms: Option<u64>,
    /// An upstream fetch for the key is running
    pub in_flight: bool,
}

impl KeyStatusResponse {
    pub fn new(key: impl Into<String>, ttl_remaining: Option<Duration>, in_flight: bool) -> Self {
        Self {
            key: key.into(),
            fresh: ttl_remaining.is_some(),
            ttl_remaining_ms: ttl_remaining.map(|ttl| ttl.as_millis() as u64),
            in_flight,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
