//! Integration tests for registration, login, refresh, and the
//! authenticated profile endpoint.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{authed_request, body_json, json_request, register_user, test_app, TEST_PASSWORD};

#[tokio::test]
async fn register_returns_user_and_token_pair() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body["access"].as_str().unwrap().is_empty());
    assert!(!body["refresh"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn register_duplicate_username_conflicts() {
    let app = test_app().await;
    register_user(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "other@example.com",
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "short",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "bob",
                "email": "not-an-email",
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() {
    let app = test_app().await;
    register_user(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "alice");
    assert!(!body["access"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = test_app().await;
    register_user(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": "wrong-password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_unknown_user() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "ghost", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_authentication() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(common::get_request("/api/auth/me"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = register_user(&app, "alice").await;
    let response = app
        .oneshot(authed_request("GET", "/api/auth/me", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn refresh_rotates_token_pair() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();
    let registered = body_json(response).await;
    let refresh = registered["refresh"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({"refresh": refresh}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["access"].as_str().unwrap().is_empty());
    assert!(!body["refresh"].as_str().unwrap().is_empty());

    // New access token works against a protected route.
    let new_access = body["access"].as_str().unwrap();
    let response = app
        .oneshot(authed_request("GET", "/api/auth/me", new_access, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let app = test_app().await;
    let access = register_user(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({"refresh": access}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_rejected_on_protected_route() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();
    let registered = body_json(response).await;
    let refresh = registered["refresh"].as_str().unwrap().to_string();

    let response = app
        .oneshot(authed_request("GET", "/api/auth/me", &refresh, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_user_cannot_login_or_refresh() {
    let (app, pool) = common::test_app_with_pool().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();
    let registered = body_json(response).await;
    let refresh = registered["refresh"].as_str().unwrap().to_string();

    sqlx::query("UPDATE users SET is_active = 0 WHERE username = ?")
        .bind("alice")
        .execute(&pool)
        .await
        .unwrap();

    // Indistinguishable from wrong credentials.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // An outstanding refresh token stops working too.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({"refresh": refresh}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_bearer_token_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(authed_request("GET", "/api/auth/me", "not.a.jwt", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
