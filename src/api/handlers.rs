//! API Handlers
//!
//! HTTP request handlers for each maintenance endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::context::AppContext;
use crate::error::{CacheError, Result};
use crate::media::{MediaCacheStats, MediaCacheStore};
use crate::models::{
    CacheStatsResponse, ClearResponse, HealthResponse, KeyStatusResponse, ObjectQuery,
    ObjectStatsResponse, RemovedResponse,
};

const OBJECTS: &str = "objects";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
}

impl AppState {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn from_shared(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    fn media(&self, name: &str) -> Result<&Arc<MediaCacheStore>> {
        self.ctx
            .media(name)
            .ok_or_else(|| CacheError::NotFound(format!("Unknown media cache: {name}")))
    }
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let ctx = &state.ctx;
    let objects = ObjectStatsResponse::new(&ctx.objects().stats(), ctx.coordinator().in_flight());

    Json(CacheStatsResponse {
        objects,
        icons: ctx.icons().stats().await,
        images: ctx.images().stats().await,
    })
}

/// Handler for POST /cache/objects/sweep
pub async fn sweep_objects_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.ctx.objects().sweep();
    info!(removed, "Object cache swept on request");

    Json(RemovedResponse::new(OBJECTS, removed))
}

/// Handler for DELETE /cache/objects
///
/// Clears the whole object cache, or only `?key=` when given.
pub async fn clear_objects_handler(
    State(state): State<AppState>,
    Query(query): Query<ObjectQuery>,
) -> Result<Json<ClearResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let objects = state.ctx.objects();
    match query.key {
        Some(key) => {
            if !objects.remove(&key) {
                return Err(CacheError::NotFound(format!("Key not found: {key}")));
            }
            Ok(Json(ClearResponse::removed(OBJECTS, &key)))
        }
        None => {
            objects.clear();
            info!("Object cache cleared on request");
            Ok(Json(ClearResponse::cleared(OBJECTS)))
        }
    }
}

/// Handler for GET /cache/keys/:key
pub async fn key_status_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<KeyStatusResponse> {
    let ttl_remaining = state.ctx.objects().ttl_remaining(&key);
    let in_flight = state.ctx.coordinator().is_in_flight(&key);

    Json(KeyStatusResponse::new(key, ttl_remaining, in_flight))
}

/// Handler for GET /cache/media/:store/stats
pub async fn media_stats_handler(
    State(state): State<AppState>,
    Path(store): Path<String>,
) -> Result<Json<MediaCacheStats>> {
    let media = state.media(&store)?;
    Ok(Json(media.stats().await))
}

/// Handler for POST /cache/media/:store/cleanup
pub async fn cleanup_media_handler(
    State(state): State<AppState>,
    Path(store): Path<String>,
) -> Result<Json<RemovedResponse>> {
    let media = state.media(&store)?;
    let removed = media.cleanup().await;

    Ok(Json(RemovedResponse::new(media.name(), removed)))
}

/// Handler for DELETE /cache/media/:store
pub async fn clear_media_handler(
    State(state): State<AppState>,
    Path(store): Path<String>,
) -> Result<Json<ClearResponse>> {
    let media = state.media(&store)?;
    media.clear().await;

    Ok(Json(ClearResponse::cleared(media.name())))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
