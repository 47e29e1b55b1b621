//! HTTP-level integration tests for registration, login, user lookup, and
//! bearer-token enforcement.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json};
use sqlx::PgPool;
use vinyl_api::auth::{Authenticator, Principal};
use vinyl_core::error::CoreError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn register(pool: &PgPool, email: &str, password: &str) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({ "email": email, "password": password, "name": "Test Collector" }),
    )
    .await
}

async fn login(pool: &PgPool, email: &str, password: &str) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await
}

/// Accepts exactly one fixed token; stands in for an external identity provider.
struct StaticAuthenticator;

impl Authenticator for StaticAuthenticator {
    fn authenticate(&self, token: &str) -> Result<Principal, CoreError> {
        if token == "let-me-in" {
            Ok(Principal {
                user_id: 99,
                email: "static@example.com".into(),
            })
        } else {
            Err(CoreError::Unauthorized("Unknown token".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_201_without_password_hash(pool: PgPool) {
    let response = register(&pool, "digger@example.com", "secret123").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["email"], "digger@example.com");
    assert_eq!(json["name"], "Test Collector");
    assert!(json["id"].is_number());
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_returns_409(pool: PgPool) {
    register(&pool, "twice@example.com", "secret123").await;
    let response = register(&pool, "twice@example.com", "another1").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_password_returns_400(pool: PgPool) {
    let response = register(&pool, "short@example.com", "12345").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_email_returns_400(pool: PgPool) {
    let response = register(&pool, "not-an-email", "secret123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_bearer_token(pool: PgPool) {
    register(&pool, "login@example.com", "secret123").await;
    let response = login(&pool, "login@example.com", "secret123").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 3600);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_returns_401(pool: PgPool) {
    register(&pool, "wrongpw@example.com", "secret123").await;
    let response = login(&pool, "wrongpw@example.com", "incorrect").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_unknown_email_returns_401(pool: PgPool) {
    let response = login(&pool, "ghost@example.com", "whatever").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn issued_token_opens_protected_routes(pool: PgPool) {
    register(&pool, "reader@example.com", "secret123").await;
    let json = body_json(login(&pool, "reader@example.com", "secret123").await).await;
    let token = json["access_token"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users/reader@example.com", token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(response).await;
    assert_eq!(user["email"], "reader@example.com");
}

// ---------------------------------------------------------------------------
// User lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_user_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users/nobody@example.com", &common::test_token()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User with email nobody@example.com not found");
}

// ---------------------------------------------------------------------------
// Bearer-token enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/products").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing Authorization header");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/products", "garbage.token.value").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn custom_authenticator_is_consulted(pool: PgPool) {
    let app = common::build_test_app_with(pool.clone(), Arc::new(StaticAuthenticator));
    let response = get_auth(app, "/api/v1/products", "let-me-in").await;
    assert_eq!(response.status(), StatusCode::OK);

    // A perfectly valid JWT means nothing to this authenticator.
    let app = common::build_test_app_with(pool, Arc::new(StaticAuthenticator));
    let response = get_auth(app, "/api/v1/products", &common::test_token()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
