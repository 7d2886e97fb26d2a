pub mod admin;
pub mod auth;
pub mod health;
pub mod workshop;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/logout                       logout (public; clears cookie)
///
/// /workshop/start                    anonymous guest start (public)
/// /workshop/join                     join a session by code
/// /workshop/me                       the caller's progress record
/// /workshop/me/profile               save profile (block 0)
/// /workshop/me/step1..step7          save a step slot
/// /workshop/me/step2/classify        classify step-1 activities (POST)
///
/// /admin/sessions                    list, create, toggle active (operators)
/// /admin/blocks                      gate board: read, set status (operators)
/// /admin/participants                participant monitor (operators)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/workshop", workshop::router())
        .nest("/admin", admin::router())
}
