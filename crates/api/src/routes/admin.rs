//! Route definitions for the `/admin` console.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the operator roles.
///
/// ```text
/// GET   /sessions      -> list sessions with counts
/// POST  /sessions      -> create session
/// PATCH /sessions      -> toggle active flag
/// GET   /blocks        -> gate board for a session
/// PATCH /blocks        -> set one block's gate status
/// GET   /participants  -> participant monitor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            get(admin::list_sessions)
                .post(admin::create_session)
                .patch(admin::update_session),
        )
        .route(
            "/blocks",
            get(admin::get_blocks).patch(admin::set_block_status),
        )
        .route("/participants", get(admin::list_participants))
}
