//! Cache Module
//!
//! In-memory object cache with per-entry TTL, expire-on-read and a
//! periodic sweep.

mod entry;
mod lock;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, is_fresh, CacheEntry};
pub use stats::CacheStats;
pub use store::ObjectCache;

pub(crate) use lock::mutex_lock;
