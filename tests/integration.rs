//! Integration tests: full router (gate + handlers) over the in-memory user store.
//!
//! Run with `cargo test`. No external services are needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use authsvc::auth::JwtSecret;
use authsvc::db::MemoryUserStore;
use authsvc::{create_app, AppState};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tokio_test::assert_ok;
use tower::util::ServiceExt;

const JWT_SECRET: &str = "test-jwt-secret-min-32-chars!!!!";
const ADMIN_EMAIL: &str = "root@x.com";
const ADMIN_PASSWORD: &str = "rootpw";

async fn test_app() -> axum::Router {
    let state = AppState::new(
        Arc::new(MemoryUserStore::new()),
        JwtSecret::new(JWT_SECRET, 3600),
    );
    assert_ok!(state.auth_service().ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD).await);
    create_app(state)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &axum::Router, email: &str, password: &str, name: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": password, "displayName": name })),
    )
    .await
}

async fn login(app: &axum::Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn token_for(app: &axum::Router, email: &str, password: &str) -> String {
    let (status, json) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "login for {} should succeed", email);
    json["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let (status, json) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn health_head_is_public() {
    let app = test_app().await;
    let (status, _) = send(&app, "HEAD", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn long_passwords_are_accepted() {
    let app = test_app().await;
    let password = "p".repeat(200);
    let (status, _) = register(&app, "long@x.com", &password, "Long").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = login(&app, "long@x.com", &password).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_login_and_admin_listing() {
    let app = test_app().await;

    let (status, json) = register(&app, "a@x.com", "secret1", "Alice").await;
    assert_eq!(status, StatusCode::OK, "register should succeed");
    assert_eq!(json["user"]["role"], "USER");

    let (status, json) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK, "login should succeed");
    assert!(json["token"].as_str().is_some(), "response should contain token");
    assert_eq!(json["email"], "a@x.com");
    assert_eq!(json["role"], "USER");
    assert_eq!(json["displayName"], "Alice");

    let claims = JwtSecret::new(JWT_SECRET, 3600)
        .validate(json["token"].as_str().unwrap(), Utc::now())
        .unwrap();
    assert_eq!(claims.subject, "a@x.com");
    assert_eq!(claims.role, "USER");

    let admin = token_for(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, json) = send(&app, "GET", "/auth/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = json.as_array().unwrap();
    let alice = users
        .iter()
        .find(|u| u["email"] == "a@x.com")
        .expect("Alice should be listed");
    assert_eq!(alice["role"], "USER");
    assert_eq!(alice["displayName"], "Alice");
    for user in users {
        let fields = user.as_object().unwrap();
        assert!(fields.keys().all(|k| !k.to_lowercase().contains("password")));
    }
}

#[tokio::test]
async fn client_supplied_role_is_ignored() {
    let app = test_app().await;
    let (status, json) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "sneaky@x.com", "password": "secret1", "displayName": "S", "role": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["role"], "USER");
}

#[tokio::test]
async fn registration_validation_errors_are_400() {
    let app = test_app().await;

    let (status, json) = register(&app, "a@x.com", "12345", "Alice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("at least 6"));

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "displayName": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = test_app().await;
    let (status, _) = register(&app, "a@x.com", "secret1", "Alice").await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = register(&app, "a@x.com", "another1", "Bob").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Email address already registered");

    let (status, json) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["displayName"], "Alice");
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let app = test_app().await;
    register(&app, "a@x.com", "secret1", "Alice").await;

    let wrong_password = login(&app, "a@x.com", "wrong-pw").await;
    let unknown_email = login(&app, "ghost@x.com", "secret1").await;
    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn protected_routes_fail_closed() {
    let app = test_app().await;
    register(&app, "a@x.com", "secret1", "Alice").await;

    let (status, _) = send(&app, "GET", "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/auth/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = JwtSecret::new("some-other-secret-that-is-32-chars", 3600)
        .issue("a@x.com", "ADMIN", Utc::now())
        .unwrap();
    let (status, _) = send(&app, "GET", "/auth/users", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = JwtSecret::new(JWT_SECRET, 3600)
        .issue("a@x.com", "USER", Utc::now() - Duration::hours(2))
        .unwrap();
    let (status, _) = send(&app, "GET", "/auth/me", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = token_for(&app, "a@x.com", "secret1").await;
    let (status, json) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "a@x.com");
}

#[tokio::test]
async fn user_management_requires_admin_role() {
    let app = test_app().await;
    register(&app, "a@x.com", "secret1", "Alice").await;
    let token = token_for(&app, "a@x.com", "secret1").await;

    let (status, _) = send(&app, "GET", "/auth/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", "/auth/users/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_change_flows_into_next_login() {
    let app = test_app().await;
    let (_, json) = register(&app, "a@x.com", "secret1", "Alice").await;
    let id = json["user"]["id"].as_i64().unwrap();
    let admin = token_for(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/auth/users/9999/role",
        Some(&admin),
        Some(json!({ "role": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/auth/users/{}/role", id),
        Some(&admin),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/auth/users/{}/role", id),
        Some(&admin),
        Some(json!({ "role": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["role"], "ADMIN");

    let (status, json) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["role"], "ADMIN");
    let promoted = json["token"].as_str().unwrap().to_string();
    let (status, _) = send(&app, "GET", "/auth/users", Some(&promoted), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleted_user_login_matches_wrong_password() {
    let app = test_app().await;
    let (_, json) = register(&app, "a@x.com", "secret1", "Alice").await;
    let id = json["user"]["id"].as_i64().unwrap();
    let admin = token_for(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _) = send(&app, "DELETE", "/auth/users/9999", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/auth/users/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let after_delete = login(&app, "a@x.com", "secret1").await;
    let wrong_password = login(&app, ADMIN_EMAIL, "wrong-pw").await;
    assert_eq!(after_delete.0, StatusCode::UNAUTHORIZED);
    assert_eq!(after_delete, wrong_password);
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = test_app().await;
    let admin = token_for(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, _) = send(&app, "DELETE", "/auth/users/abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
