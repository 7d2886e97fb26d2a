//! HTTP-level integration tests for registration, login, logout, and
//! token transport (Bearer header and session cookie).

mod common;

use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get_auth, post_json};
use sqlx::PgPool;
use tower::ServiceExt;

/// Registration returns 201 with a token, the normalized email, and an
/// HTTP-only session cookie.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "  Aiko@Example.COM ", "password": "long-enough" });
    let response = post_json(&app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("registration must set a session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("atelier_session="));
    assert!(cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], "aiko@example.com");
    assert_eq!(json["user"]["role"], "participant");
}

/// A malformed email or a short password is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_validation(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        serde_json::json!({ "email": "not-an-email", "password": "long-enough" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        serde_json::json!({ "email": "a@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Registering the same email twice returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "dup@example.com", "password": "long-enough" });

    let response = post_json(&app, "/api/v1/auth/register", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Login succeeds with the registered credentials and fails with 401 for
/// a wrong password or an unknown email.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(
        &app,
        "/api/v1/auth/register",
        serde_json::json!({ "email": "login@example.com", "password": "long-enough" }),
    )
    .await;

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "login@example.com", "password": "long-enough" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["token"].is_string());

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "login@example.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@example.com", "password": "whatever" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Guest accounts created by the anonymous start can never log in with
/// credentials; their stored hash is a sentinel, not a real hash.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_guest_cannot_login(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, _) = common::start_guest(&app).await;

    let me = get_auth(&app, "/api/v1/workshop/me", &token).await;
    assert_eq!(me.status(), StatusCode::OK);
    let user_id = body_json(me).await["user_id"].as_i64().unwrap();

    let guest = atelier_db::repositories::UserRepo::find_by_id(&pool, user_id)
        .await
        .unwrap()
        .expect("guest user must exist");
    assert!(guest.is_guest());

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": guest.email, "password": "anything-at-all" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout clears the session cookie.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_clears_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(&app, "/api/v1/auth/logout", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("logout must clear the cookie")
        .to_str()
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

/// Authenticated routes reject requests without a token, and accept the
/// token from the session cookie as well as the Bearer header.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_token_transport(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(&app, "/api/v1/workshop/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let register = post_json(
        &app,
        "/api/v1/auth/register",
        serde_json::json!({ "email": "cookie@example.com", "password": "long-enough" }),
    )
    .await;
    let set_cookie = register
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    // The cookie pair is everything before the first attribute.
    let pair = set_cookie.split(';').next().unwrap();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/workshop/me")
        .header(COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// A garbage Bearer token is rejected with 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_token_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(&app, "/api/v1/workshop/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
