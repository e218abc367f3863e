//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each maintenance endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use matchday::api::{create_router, AppState};
use matchday::storage::MemoryStore;
use matchday::{AppContext, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_context() -> Arc<AppContext> {
    Arc::new(AppContext::new(Config::default(), Arc::new(MemoryStore::new())))
}

fn create_test_app(ctx: &Arc<AppContext>) -> Router {
    create_router(AppState::from_shared(Arc::clone(ctx)))
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let ctx = create_test_context();

    let (status, json) = send(create_test_app(&ctx), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_reports_all_caches() {
    let ctx = create_test_context();
    ctx.objects().set("team:33", json!({"name": "Manchester United"}), None);
    ctx.objects().get("team:33");
    ctx.objects().get("team:40");
    ctx.icons()
        .set("https://media.example.com/flags/gb.svg", "<svg/>", None, None)
        .await;
    ctx.images()
        .set("https://media.example.com/teams/33.png", "A".repeat(400), None, None)
        .await;

    let (status, json) = send(create_test_app(&ctx), "GET", "/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["objects"]["hits"], 1);
    assert_eq!(json["objects"]["misses"], 1);
    assert_eq!(json["objects"]["total_entries"], 1);
    assert_eq!(json["objects"]["in_flight"], 0);
    assert_eq!(json["icons"]["count"], 1);
    assert_eq!(json["icons"]["count_by_kind"]["svg"], 1);
    assert_eq!(json["images"]["total_bytes"], 300);
}

#[tokio::test]
async fn test_stats_empty_media_has_no_timestamps() {
    let ctx = create_test_context();

    let (_, json) = send(create_test_app(&ctx), "GET", "/cache/stats").await;

    assert!(json["icons"]["oldest_timestamp"].is_null());
    assert!(json["images"]["newest_timestamp"].is_null());
}

// == Object Cache Endpoint Tests ==

#[tokio::test]
async fn test_sweep_removes_stale_objects() {
    let ctx = create_test_context();
    ctx.objects()
        .set("standings:39:2024", json!([]), Some(Duration::from_millis(10)));
    ctx.objects().set("standings:39:2023", json!([]), None);
    tokio::time::sleep(Duration::from_millis(30)).await;

    let (status, json) = send(create_test_app(&ctx), "POST", "/cache/objects/sweep").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"], "objects");
    assert_eq!(json["removed"], 1);
    assert!(ctx.objects().has("standings:39:2023"));
}

#[tokio::test]
async fn test_clear_objects() {
    let ctx = create_test_context();
    ctx.objects().set("team:33", json!({}), None);
    ctx.objects().set("team:34", json!({}), None);

    let (status, json) = send(create_test_app(&ctx), "DELETE", "/cache/objects").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("cleared"));
    assert!(ctx.objects().is_empty());
}

#[tokio::test]
async fn test_remove_single_object() {
    let ctx = create_test_context();
    ctx.objects().set("team:33", json!({}), None);
    ctx.objects().set("team:34", json!({}), None);

    let (status, _) = send(create_test_app(&ctx), "DELETE", "/cache/objects?key=team:33").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ctx.objects().has("team:33"));
    assert!(ctx.objects().has("team:34"));

    let (status, json) = send(create_test_app(&ctx), "DELETE", "/cache/objects?key=team:33").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("team:33"));
}

#[tokio::test]
async fn test_remove_empty_key_rejected() {
    let ctx = create_test_context();

    let (status, json) = send(create_test_app(&ctx), "DELETE", "/cache/objects?key=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_key_status() {
    let ctx = create_test_context();
    ctx.objects().set(
        "fixtures:39:2024:Regular Season - 1",
        json!({"response": []}),
        Some(Duration::from_secs(120)),
    );

    let (status, json) = send(
        create_test_app(&ctx),
        "GET",
        "/cache/keys/fixtures:39:2024:Regular%20Season%20-%201",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "fixtures:39:2024:Regular Season - 1");
    assert_eq!(json["fresh"], true);
    assert!(json["ttl_remaining_ms"].as_u64().unwrap() <= 120_000);
    assert_eq!(json["in_flight"], false);
}

#[tokio::test]
async fn test_key_status_stale_entry() {
    let ctx = create_test_context();
    ctx.objects()
        .set("rounds:39:2024", json!([]), Some(Duration::from_millis(10)));
    tokio::time::sleep(Duration::from_millis(30)).await;

    let (status, json) = send(create_test_app(&ctx), "GET", "/cache/keys/rounds:39:2024").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fresh"], false);
    assert!(json["ttl_remaining_ms"].is_null());
}

// == Media Cache Endpoint Tests ==

#[tokio::test]
async fn test_media_stats() {
    let ctx = create_test_context();
    ctx.images()
        .set("https://media.example.com/teams/33.png", "AAAA", None, None)
        .await;
    ctx.images()
        .set("https://media.example.com/players/276.jpg", "AAAA", None, None)
        .await;

    let (status, json) = send(create_test_app(&ctx), "GET", "/cache/media/images/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["count_by_kind"]["png"], 1);
    assert_eq!(json["count_by_kind"]["jpg"], 1);
}

#[tokio::test]
async fn test_media_cleanup_removes_stale() {
    let ctx = create_test_context();
    ctx.icons()
        .set(
            "https://media.example.com/flags/fr.svg",
            "<svg/>",
            None,
            Some(Duration::from_millis(10)),
        )
        .await;
    ctx.icons()
        .set("https://media.example.com/flags/gb.svg", "<svg/>", None, None)
        .await;
    tokio::time::sleep(Duration::from_millis(30)).await;

    let (status, json) = send(create_test_app(&ctx), "POST", "/cache/media/icons/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"], "icons");
    assert_eq!(json["removed"], 1);
    assert_eq!(ctx.icons().stats().await.count, 1);
}

#[tokio::test]
async fn test_media_clear() {
    let ctx = create_test_context();
    ctx.images()
        .set("https://media.example.com/teams/33.png", "AAAA", None, None)
        .await;

    let (status, _) = send(create_test_app(&ctx), "DELETE", "/cache/media/images").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.images().stats().await.count, 0);
}

#[tokio::test]
async fn test_unknown_media_cache_is_not_found() {
    let ctx = create_test_context();

    for (method, uri) in [
        ("GET", "/cache/media/videos/stats"),
        ("POST", "/cache/media/videos/cleanup"),
        ("DELETE", "/cache/media/videos"),
    ] {
        let (status, json) = send(create_test_app(&ctx), method, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert!(json["error"].as_str().unwrap().contains("videos"));
    }
}

// == Error Handling Tests ==

#[tokio::test]
async fn test_unknown_route() {
    let ctx = create_test_context();

    let (status, _) = send(create_test_app(&ctx), "GET", "/get/team:33").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_method_not_allowed() {
    let ctx = create_test_context();

    let (status, _) = send(create_test_app(&ctx), "PUT", "/cache/stats").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
