//! Shared helpers for router-level integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::PathBuf;
use tower::ServiceExt;

use edunova_backend::{build_router, db, AppState, Config};

pub const TEST_PASSWORD: &str = "password-123";

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        database_path: PathBuf::from(":memory:"),
        jwt_secret: "integration-test-secret".to_string(),
        access_token_minutes: 60,
        refresh_token_days: 7,
        openai_api_key: None,
        unsplash_access_key: None,
        youtube_api_key: None,
    }
}

/// Build an app against a fresh in-memory database. No third-party keys are
/// configured, so generation exercises the fallback path.
pub async fn test_app() -> Router {
    let (app, _) = test_app_with_pool().await;
    app
}

/// Like [`test_app`], but also hands back the pool for tests that need to
/// manipulate rows directly.
pub async fn test_app_with_pool() -> (Router, sqlx::SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    db::init_tables(&pool).await.unwrap();

    let state = AppState::new(pool.clone(), test_config());
    (build_router(state), pool)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return their access token.
pub async fn register_user(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["access"].as_str().unwrap().to_string()
}

/// Create a lesson for the given token, returning the response body.
pub async fn create_lesson(app: &Router, token: &str, topic: &str, subject: &str) -> Value {
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/lessons",
            token,
            Some(json!({
                "topic": topic,
                "subject": subject,
                "grade_level": "Grade 8",
                "duration_minutes": 45,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
