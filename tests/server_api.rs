//! HTTP API integration tests: router + handlers over an in-memory store
//! and a canned image source, exercised with `tower::ServiceExt::oneshot`.

#![cfg(feature = "server")]

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use histmatch::server::{ServerConfig, ServerState, build_router};
use histmatch::{EngineConfig, FetchError, ImageSource, MatchEngine, MemoryStore};

use common::solid_png;

/// Serves fixed bytes per locator; unknown locators report upstream 404.
struct StaticSource {
    images: HashMap<String, Bytes>,
}

#[async_trait]
impl ImageSource for StaticSource {
    async fn fetch(&self, locator: &str) -> Result<Bytes, FetchError> {
        self.images
            .get(locator)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: locator.to_string(),
                status: 404,
            })
    }
}

fn test_app(images: Vec<(&str, Vec<u8>)>) -> Router {
    let engine = Arc::new(
        MatchEngine::open(EngineConfig::default(), Arc::new(MemoryStore::new()))
            .expect("test engine"),
    );
    let source = Arc::new(StaticSource {
        images: images
            .into_iter()
            .map(|(url, bytes)| (url.to_string(), Bytes::from(bytes)))
            .collect(),
    });
    let state = Arc::new(ServerState::with_parts(
        ServerConfig::default(),
        engine,
        source,
    ));
    build_router(state)
}

async fn request(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn register_then_duplicate_then_check() {
    let red = solid_png(24, 24, [220, 30, 30]);
    let app = test_app(vec![("http://img/red", red)]);

    // First registration succeeds.
    let (status, body) = request(
        &app,
        "POST",
        "/set_recognized",
        Some(json!({ "url": "http://img/red" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "registered");
    assert_eq!(body["id"], 1);

    // Re-registering the same image is a 409.
    let (status, body) = request(
        &app,
        "POST",
        "/set_recognized",
        Some(json!({ "url": "http://img/red" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Image already known");

    // Checking the registered image matches with distance ~0.
    let (status, body) = request(
        &app,
        "POST",
        "/check",
        Some(json!({ "url": "http://img/red" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "match");
    assert_eq!(body["id"], 1);
    assert!(body["distance"].as_f64().expect("distance") < 1e-9);
}

#[tokio::test]
async fn check_reports_no_match_for_unrelated_image() {
    let app = test_app(vec![
        ("http://img/red", solid_png(24, 24, [220, 30, 30])),
        ("http://img/blue", solid_png(24, 24, [30, 30, 220])),
    ]);

    request(
        &app,
        "POST",
        "/set_recognized",
        Some(json!({ "url": "http://img/red" })),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/check",
        Some(json!({ "url": "http://img/blue" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "no match");
}

#[tokio::test]
async fn known_lists_ids_in_insertion_order() {
    let app = test_app(vec![
        ("http://img/a", solid_png(16, 16, [250, 10, 10])),
        ("http://img/b", solid_png(16, 16, [10, 250, 10])),
    ]);

    for url in ["http://img/a", "http://img/b"] {
        let (status, _) = request(
            &app,
            "POST",
            "/set_recognized",
            Some(json!({ "url": url })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = request(&app, "GET", "/known", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["ids"], json!([1, 2]));
}

#[tokio::test]
async fn health_reports_registry_size() {
    let app = test_app(vec![("http://img/a", solid_png(16, 16, [9, 9, 9]))]);

    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["known_images"], 0);

    request(
        &app,
        "POST",
        "/set_recognized",
        Some(json!({ "url": "http://img/a" })),
    )
    .await;

    let (_, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(body["known_images"], 1);
}

#[tokio::test]
async fn fetch_failure_maps_to_bad_gateway() {
    let app = test_app(vec![]);

    let (status, body) = request(
        &app,
        "POST",
        "/check",
        Some(json!({ "url": "http://img/missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "FETCH_ERROR");
}

#[tokio::test]
async fn undecodable_fetched_bytes_map_to_unprocessable_entity() {
    let app = test_app(vec![("http://img/garbage", b"not a png".to_vec())]);

    let (status, body) = request(
        &app,
        "POST",
        "/set_recognized",
        Some(json!({ "url": "http://img/garbage" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "DECODE_ERROR");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app(vec![]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/check")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .expect("build request"),
        )
        .await
        .expect("send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app(vec![]);
    let (status, body) = request(&app, "GET", "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
