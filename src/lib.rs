//! Matchday - caching and request coordination for a football data client
//!
//! Sits between screens and a rate-limited sports API: an object cache with
//! per-entry TTLs chosen from fixture volatility, one shared upstream fetch
//! per key, and persistent size-bounded caches for flags and crests.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod fixtures;
pub mod keys;
pub mod media;
pub mod models;
pub mod service;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use context::AppContext;
pub use keys::CacheKey;
pub use service::{MatchdayService, Upstream};
