//! Router-level tests for the Pub/Sub push endpoint.
//!
//! These run against the real router with a lazily-connected pool: the
//! rejection paths never touch the database, and the insert path is
//! exercised against an unreachable address to observe the 500 mapping.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use tower::ServiceExt;

use report_ingest::app_state::AppState;
use report_ingest::create_router;

/// Pool that connects only on first acquire. Port 9 (discard) is closed
/// on any sane host, so acquiring fails quickly when a test reaches the
/// insert path.
fn unreachable_state() -> AppState {
    let options = MySqlConnectOptions::new()
        .host("127.0.0.1")
        .port(9)
        .username("report")
        .password("report")
        .database("report");
    let pool = MySqlPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(options);
    AppState { pool }
}

fn push_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not UTF-8")
}

#[tokio::test]
async fn empty_body_returns_400_no_message() {
    let app = create_router(unreachable_state());

    let response = app.oneshot(push_request("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Bad Request: no Pub/Sub message received"
    );
}

#[tokio::test]
async fn garbage_body_returns_400_no_message() {
    let app = create_router(unreachable_state());

    let response = app.oneshot(push_request("definitely not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Bad Request: no Pub/Sub message received"
    );
}

#[tokio::test]
async fn missing_message_field_returns_400_invalid_format() {
    let app = create_router(unreachable_state());

    let response = app
        .oneshot(push_request(r#"{"subscription":"projects/p/subscriptions/s"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Bad Request: invalid Pub/Sub message format"
    );
}

#[tokio::test]
async fn non_object_envelope_returns_400_invalid_format() {
    let app = create_router(unreachable_state());

    let response = app.oneshot(push_request(r#"[1,2,3]"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Bad Request: invalid Pub/Sub message format"
    );
}

#[tokio::test]
async fn valid_envelope_with_unreachable_db_returns_500() {
    let app = create_router(unreachable_state());

    // base64 of "World"
    let response = app
        .oneshot(push_request(r#"{"message":{"data":"V29ybGQ="}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_string(response).await,
        "Unable to successfully insert inspect report ! Please check the application logs for more details."
    );
}

#[tokio::test]
async fn handler_survives_insert_failure() {
    // The pool must stay usable after a failed acquire: a second request
    // gets the same clean 500, not a hang or panic.
    let state = unreachable_state();

    for _ in 0..2 {
        let app = create_router(state.clone());
        let response = app
            .oneshot(push_request(r#"{"message":{"data":"V29ybGQ="}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[tokio::test]
async fn health_check_returns_healthy() {
    let app = create_router(unreachable_state());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_string(response).await)
        .expect("health response should be JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "report-ingest");
}
