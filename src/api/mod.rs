//! API Module
//!
//! Maintenance endpoints over the application's caches.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /cache/stats` - Object and media cache statistics
//! - `POST /cache/objects/sweep` - Remove stale object cache entries
//! - `DELETE /cache/objects[?key=...]` - Clear the object cache or remove one key
//! - `GET /cache/keys/:key` - Freshness and in-flight status of one key
//! - `GET /cache/media/:store/stats` - Statistics of one media cache
//! - `POST /cache/media/:store/cleanup` - Remove stale media records
//! - `DELETE /cache/media/:store` - Clear one media cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
