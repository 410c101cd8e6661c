//! Auth API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::TestContext;

/// Test registering a user returns an id and token.
#[tokio::test]
#[ignore = "requires database"]
async fn test_register_returns_token() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({ "name": "Alice", "email": "alice@example.com" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let user_id = body["userId"].as_str().unwrap().to_string();
    assert!(!body["token"].as_str().unwrap().is_empty());

    ctx.cleanup_user(&user_id).await;
}

/// Test /api/auth/me round trip with a fresh token.
#[tokio::test]
#[ignore = "requires database"]
async fn test_me_returns_current_user() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;

    let response = server
        .get("/api/auth/me")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["userId"], user_id);
    assert_eq!(body["email"], "test@example.com");

    ctx.cleanup_user(&user_id).await;
}

/// Test requests without a token are rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_missing_token_unauthorized() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

/// Test requests with an unknown token are rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_token_unauthorized() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .get("/api/auth/me")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value("not-a-real-token"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
