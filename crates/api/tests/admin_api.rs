//! HTTP-level integration tests for the admin console: RBAC, session
//! management, the block gate board, and the participant monitor.

mod common;

use atelier_core::roles::{ROLE_FACILITATOR, ROLE_PARTICIPANT};
use axum::http::StatusCode;
use common::{
    body_json, create_user_with_role, get_auth, patch_json_auth, post_json_auth, start_guest,
};
use sqlx::PgPool;

/// Create a facilitator and return their token.
async fn operator_token(pool: &PgPool) -> String {
    let (_user, token) = create_user_with_role(pool, "facilitator@example.com", ROLE_FACILITATOR).await;
    token
}

/// Participants cannot reach the console; operators can.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_console_requires_operator_role(pool: PgPool) {
    let (_user, participant) =
        create_user_with_role(&pool, "p@example.com", ROLE_PARTICIPANT).await;
    let operator = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(&app, "/api/v1/admin/sessions", &participant).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(&app, "/api/v1/admin/sessions", &operator).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Session codes are validated; a valid code creates, a duplicate
/// conflicts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_session_code_validation(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    for bad in ["ab", "ab cd", "way-too-long-for-a-session-code-because-it-keeps-going"] {
        let response = post_json_auth(
            &app,
            "/api/v1/admin/sessions",
            &token,
            serde_json::json!({ "code": bad }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "code {bad:?}");
    }

    let response = post_json_auth(
        &app,
        "/api/v1/admin/sessions",
        &token,
        serde_json::json!({ "name": "spring", "code": "abcd" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["session"]["code"], "abcd");
    assert_eq!(json["session"]["is_active"], true);

    let response = post_json_auth(
        &app,
        "/api/v1/admin/sessions",
        &token,
        serde_json::json!({ "code": "abcd" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The session list carries participant counts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_list_with_counts(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    post_json_auth(
        &app,
        "/api/v1/admin/sessions",
        &token,
        serde_json::json!({ "code": "counted" }),
    )
    .await;

    let (guest, _) = start_guest(&app).await;
    post_json_auth(
        &app,
        "/api/v1/workshop/join",
        &guest,
        serde_json::json!({ "code": "counted" }),
    )
    .await;

    let json = body_json(get_auth(&app, "/api/v1/admin/sessions", &token).await).await;
    let sessions = json["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["participant_count"], 1);
}

/// Toggling a session's active flag; an unknown id is 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_session_active_flag(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let created = body_json(
        post_json_auth(
            &app,
            "/api/v1/admin/sessions",
            &token,
            serde_json::json!({ "code": "toggle" }),
        )
        .await,
    )
    .await;
    let id = created["session"]["id"].as_i64().unwrap();

    let response = patch_json_auth(
        &app,
        "/api/v1/admin/sessions",
        &token,
        serde_json::json!({ "id": id, "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["session"]["is_active"], false);

    let response = patch_json_auth(
        &app,
        "/api/v1/admin/sessions",
        &token,
        serde_json::json!({ "id": 999999, "is_active": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The gate board lists all nine blocks; pairs without a stored row are
/// LOCKED with no opened_at.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_gate_board_defaults_to_locked(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let created = body_json(
        post_json_auth(
            &app,
            "/api/v1/admin/sessions",
            &token,
            serde_json::json!({ "code": "gates" }),
        )
        .await,
    )
    .await;
    let id = created["session"]["id"].as_i64().unwrap();

    let json = body_json(
        get_auth(&app, &format!("/api/v1/admin/blocks?session_id={id}"), &token).await,
    )
    .await;
    let blocks = json["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 9);
    assert!(blocks.iter().all(|b| b["status"] == "LOCKED"));
    assert!(blocks.iter().all(|b| b["opened_at"].is_null()));
    assert_eq!(blocks[0]["block_id"], "block_0");
    assert_eq!(blocks[8]["block_id"], "block_8");
}

/// Opening a block stamps opened_at; closing it later keeps the stamp.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_open_stamps_and_close_preserves(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let created = body_json(
        post_json_auth(
            &app,
            "/api/v1/admin/sessions",
            &token,
            serde_json::json!({ "code": "stamps" }),
        )
        .await,
    )
    .await;
    let id = created["session"]["id"].as_i64().unwrap();

    let opened = body_json(
        patch_json_auth(
            &app,
            "/api/v1/admin/blocks",
            &token,
            serde_json::json!({ "session_id": id, "block_id": "block_2", "status": "OPEN" }),
        )
        .await,
    )
    .await;
    assert_eq!(opened["block"]["status"], "OPEN");
    assert!(opened["block"]["opened_at"].is_string());

    let closed = body_json(
        patch_json_auth(
            &app,
            "/api/v1/admin/blocks",
            &token,
            serde_json::json!({ "session_id": id, "block_id": "block_2", "status": "CLOSED" }),
        )
        .await,
    )
    .await;
    assert_eq!(closed["block"]["status"], "CLOSED");
    assert!(
        closed["block"]["opened_at"].is_string(),
        "closing must not clear the opening stamp"
    );
}

/// Unknown block ids and gate statuses are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_gate_input_validation(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(
        &app,
        "/api/v1/admin/blocks",
        &token,
        serde_json::json!({ "block_id": "block_9", "status": "OPEN" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        &app,
        "/api/v1/admin/blocks",
        &token,
        serde_json::json!({ "block_id": "block_1", "status": "open" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// With no sessions at all, the gate board creates a default session so
/// a fresh install works out of the box.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_gate_board_creates_default_session(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(&app, "/api/v1/admin/blocks", &token).await).await;
    assert_eq!(json["blocks"].as_array().unwrap().len(), 9);
    let code = json["session"]["code"].as_str().unwrap();
    assert!(code.starts_with("session"), "default code was {code:?}");

    // An explicit unknown id must still 404, not fall back.
    let response = get_auth(&app, "/api/v1/admin/blocks?session_id=999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The participant monitor aggregates completion counts per block and
/// reports per-participant progress.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_participant_monitor_aggregation(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let (first, _) = start_guest(&app).await;
    let (_second, _) = start_guest(&app).await;

    patch_json_auth(
        &app,
        "/api/v1/workshop/me/profile",
        &first,
        serde_json::json!({ "name": "Aiko" }),
    )
    .await;
    patch_json_auth(
        &app,
        "/api/v1/workshop/me/step1",
        &first,
        serde_json::json!({ "activities": [{ "description": "work", "hours": 40 }] }),
    )
    .await;

    let json = body_json(get_auth(&app, "/api/v1/admin/participants", &token).await).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["block_completion"]["block_0"], 1);
    assert_eq!(json["block_completion"]["block_1"], 1);
    assert_eq!(json["block_completion"]["block_8"], 0);

    let participants = json["participants"].as_array().unwrap();
    let aiko = participants
        .iter()
        .find(|p| p["name"] == "Aiko")
        .expect("profile name should surface in the monitor");
    // block_0 and block_1 of nine: 2/9 rounds to 22.
    assert_eq!(aiko["progress_percent"], 22);

    let other = participants.iter().find(|p| p["name"].is_null()).unwrap();
    assert_eq!(other["progress_percent"], 0);
}

/// Filtering the monitor by session only lists attached participants.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_participant_monitor_session_filter(pool: PgPool) {
    let token = operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let created = body_json(
        post_json_auth(
            &app,
            "/api/v1/admin/sessions",
            &token,
            serde_json::json!({ "code": "filtered" }),
        )
        .await,
    )
    .await;
    let id = created["session"]["id"].as_i64().unwrap();

    let (joined, _) = start_guest(&app).await;
    let (_unjoined, _) = start_guest(&app).await;
    post_json_auth(
        &app,
        "/api/v1/workshop/join",
        &joined,
        serde_json::json!({ "code": "filtered" }),
    )
    .await;

    let json = body_json(
        get_auth(&app, &format!("/api/v1/admin/participants?session_id={id}"), &token).await,
    )
    .await;
    assert_eq!(json["total"], 1);
}
