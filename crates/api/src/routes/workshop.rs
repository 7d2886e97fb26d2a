//! Route definitions for the `/workshop` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::workshop;
use crate::state::AppState;

/// Routes mounted at `/workshop`.
///
/// ```text
/// POST  /start               -> anonymous guest start
/// POST  /join                -> join session by code
/// GET   /me                  -> progress record (lazy-created)
/// PATCH /me/profile          -> save profile
/// PATCH /me/step{1..7}       -> save step slot
/// POST  /me/step2/classify   -> classify step-1 activities
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(workshop::start))
        .route("/join", post(workshop::join))
        .route("/me", get(workshop::me))
        .route("/me/profile", patch(workshop::save_profile))
        .route("/me/step1", patch(workshop::save_step1))
        .route("/me/step2", patch(workshop::save_step2))
        .route("/me/step2/classify", post(workshop::classify))
        .route("/me/step3", patch(workshop::save_step3))
        .route("/me/step4", patch(workshop::save_step4))
        .route("/me/step5", patch(workshop::save_step5))
        .route("/me/step6", patch(workshop::save_step6))
        .route("/me/step7", patch(workshop::save_step7))
}
