//! Handlers for the `/auth` resource (register, login, logout).

use std::sync::LazyLock;

use atelier_core::error::CoreError;
use atelier_core::roles::ROLE_PARTICIPANT;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::Json;
use regex::Regex;
use serde::{Deserialize, Serialize};

use atelier_db::models::user::{CreateUser, User, UserResponse};
use atelier_db::repositories::{ProgressRepo, UserRepo};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Loose email shape check; real validation happens at the mailbox.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register, login, and
/// the anonymous workshop start. The token is also set as an HTTP-only
/// cookie; the body copy serves non-browser clients.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a participant account and establish a session.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(
    StatusCode,
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<AuthResponse>,
)> {
    let email = normalize_email(&input.email);
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            role: ROLE_PARTICIPANT.to_string(),
        },
    )
    .await?;

    // Eagerly create the progress record so the first /workshop/me read
    // already has a row.
    ProgressRepo::create_empty(&state.pool, user.id, None).await?;

    tracing::info!(user_id = user.id, "registered new participant");

    let (cookie, response) = establish_session(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(response),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<AuthResponse>,
)> {
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // Guest accounts carry a sentinel instead of a hash and can never
    // log in with credentials.
    if user.is_guest() {
        return Err(invalid_credentials());
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    let (cookie, response) = establish_session(&state, &user)?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(response)))
}

/// POST /api/v1/auth/logout
///
/// Clear the session cookie. Tokens are stateless, so there is nothing
/// to revoke server-side.
pub async fn logout(
    State(state): State<AppState>,
) -> (
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<serde_json::Value>,
) {
    let cookie = clear_session_cookie(&state.config.jwt.cookie_name);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(serde_json::json!({ "ok": true })),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Generate a token and build the cookie + JSON response pair.
pub(crate) fn establish_session(
    state: &AppState,
    user: &User,
) -> AppResult<(String, AuthResponse)> {
    let token = generate_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let cookie = session_cookie(
        &state.config.jwt.cookie_name,
        &token,
        state.config.jwt.expiry_secs(),
    );

    Ok((
        cookie,
        AuthResponse {
            token,
            user: UserResponse::from(user),
        },
    ))
}
