//! API Routes
//!
//! Configures the Axum router with all maintenance endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_media_handler, clear_objects_handler, cleanup_media_handler, health_handler,
    key_status_handler, media_stats_handler, stats_handler, sweep_objects_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/objects", delete(clear_objects_handler))
        .route("/cache/objects/sweep", post(sweep_objects_handler))
        .route("/cache/keys/:key", get(key_status_handler))
        .route("/cache/media/:store", delete(clear_media_handler))
        .route("/cache/media/:store/stats", get(media_stats_handler))
        .route("/cache/media/:store/cleanup", post(cleanup_media_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::AppContext;
    use crate::storage::MemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let ctx = AppContext::new(Config::default(), Arc::new(MemoryStore::new()));
        create_router(AppState::new(ctx))
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of("GET", "/cache/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_media_routes() {
        assert_eq!(status_of("GET", "/cache/media/icons/stats").await, StatusCode::OK);
        assert_eq!(status_of("POST", "/cache/media/images/cleanup").await, StatusCode::OK);
        assert_eq!(status_of("DELETE", "/cache/media/icons").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_media_store() {
        assert_eq!(
            status_of("GET", "/cache/media/videos/stats").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_wrong_method() {
        assert_eq!(
            status_of("GET", "/cache/objects/sweep").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
