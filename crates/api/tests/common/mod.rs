#![allow(dead_code)] // each test binary uses a subset of these helpers

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use atelier_api::config::{ClassifierConfig, ServerConfig};
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_core::classify::{Classifier, ClassifyError};
use atelier_core::steps::classification::WorkCategory;
use atelier_core::steps::time_inventory::Activity;

/// Classifier stub that always fails, so classification deterministically
/// degrades to the default category for every activity.
struct UnavailableClassifier;

#[async_trait]
impl Classifier for UnavailableClassifier {
    async fn classify(&self, _: &[Activity]) -> Result<Vec<WorkCategory>, ClassifyError> {
        Err(ClassifyError::Request("classifier disabled in tests".into()))
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: atelier_api::auth::jwt::JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_days: 14,
            cookie_name: "atelier_session".to_string(),
        },
        classifier: ClassifierConfig {
            api_key: None,
            base_url: "http://localhost:0".to_string(),
            model: "unused".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a deterministic classifier stub.
///
/// This uses the same `build_app_router` as `main.rs`, so integration
/// tests exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        classifier: Arc::new(UnavailableClassifier),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request construction should succeed")
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request construction should succeed");
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request construction should succeed");
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return `(user, token)`.
pub async fn create_user_with_role(
    pool: &PgPool,
    email: &str,
    role: &str,
) -> (atelier_db::models::user::User, String) {
    let hashed = atelier_api::auth::password::hash_password("test_password_123")
        .expect("hashing should succeed");
    let user = atelier_db::repositories::UserRepo::create(
        pool,
        &atelier_db::models::user::CreateUser {
            email: email.to_string(),
            password_hash: hashed,
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");

    let token =
        atelier_api::auth::jwt::generate_token(user.id, &user.email, &user.role, &test_config().jwt)
            .expect("token generation should succeed");
    (user, token)
}

/// Start an anonymous participant via the API and return `(token, user_id)`.
pub async fn start_guest(app: &Router) -> (String, i64) {
    let response = post_json(app, "/api/v1/workshop/start", serde_json::json!({})).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["token"].as_str().expect("token in response").to_string(),
        json["user"]["id"].as_i64().expect("user id in response"),
    )
}
