//! Handlers for the `/admin` console: session management, the block gate
//! board, and the participant monitor.
//!
//! All endpoints require the admin or facilitator role. The gate board is
//! a free-form toggle: operators may move any block between any two
//! statuses, and there is no enforced ordering across blocks.

use std::collections::HashMap;
use std::sync::LazyLock;

use atelier_core::blocks::{is_valid_block_id, progress_percent, GateStatus, BLOCK_IDS};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use atelier_db::models::workshop_session::{CreateSession, WorkshopSession};
use atelier_db::repositories::{BlockGateRepo, ProgressRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOperator;
use crate::state::AppState;

/// Join codes: 4-32 characters of letters, digits, hyphen, underscore.
static SESSION_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{4,32}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/sessions`.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub code: String,
}

/// Request body for `PATCH /admin/sessions`.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub id: DbId,
    pub is_active: bool,
}

/// Query string accepted by the gate board and participant monitor.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: Option<DbId>,
}

/// Request body for `PATCH /admin/blocks`.
#[derive(Debug, Deserialize)]
pub struct SetBlockStatusRequest {
    #[serde(default)]
    pub session_id: Option<DbId>,
    pub block_id: String,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/sessions
///
/// All sessions newest-first, each with its participant count.
pub async fn list_sessions(
    RequireOperator(_user): RequireOperator,
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let sessions = SessionRepo::list_with_counts(&state.pool).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

/// POST /api/v1/admin/sessions
///
/// Create a new session with a unique join code.
pub async fn create_session(
    RequireOperator(user): RequireOperator,
    State(state): State<AppState>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let code = input.code.trim().to_string();
    if !SESSION_CODE_RE.is_match(&code) {
        return Err(AppError::Core(CoreError::Validation(
            "Session code must be 4-32 letters, digits, hyphens or underscores".into(),
        )));
    }

    if SessionRepo::find_by_code(&state.pool, &code).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Session code already in use".into(),
        )));
    }

    let name = input.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let session = SessionRepo::create(&state.pool, &CreateSession { name, code }).await?;
    tracing::info!(session_id = session.id, operator = user.user_id, "created session");

    Ok((StatusCode::CREATED, Json(json!({ "session": session }))))
}

/// PATCH /api/v1/admin/sessions
///
/// Toggle a session's active flag.
pub async fn update_session(
    RequireOperator(_user): RequireOperator,
    State(state): State<AppState>,
    Json(input): Json<UpdateSessionRequest>,
) -> AppResult<Json<Value>> {
    let session = SessionRepo::set_active(&state.pool, input.id, input.is_active)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "workshop session",
            key: input.id.to_string(),
        }))?;
    Ok(Json(json!({ "session": session })))
}

// ---------------------------------------------------------------------------
// Block gate handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/blocks?session_id=N
///
/// The gate board for one session: all nine blocks with their current
/// status. Blocks without a stored gate row are LOCKED.
pub async fn get_blocks(
    RequireOperator(_user): RequireOperator,
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Json<Value>> {
    let session = resolve_session(&state, query.session_id).await?;
    let gates = BlockGateRepo::list_for_session(&state.pool, session.id).await?;

    let by_block: HashMap<&str, _> = gates.iter().map(|g| (g.block_id.as_str(), g)).collect();
    let blocks: Vec<Value> = BLOCK_IDS
        .iter()
        .map(|block_id| match by_block.get(block_id) {
            Some(gate) => json!({
                "block_id": block_id,
                "status": gate.status,
                "opened_at": gate.opened_at,
            }),
            None => json!({
                "block_id": block_id,
                "status": GateStatus::Locked.as_str(),
                "opened_at": null,
            }),
        })
        .collect();

    Ok(Json(json!({ "session": session, "blocks": blocks })))
}

/// PATCH /api/v1/admin/blocks
///
/// Set the gate status of one block. A transition into OPEN stamps
/// `opened_at` and the acting operator; other transitions leave them as
/// they are, so the opening history survives a later CLOSED.
pub async fn set_block_status(
    RequireOperator(user): RequireOperator,
    State(state): State<AppState>,
    Json(input): Json<SetBlockStatusRequest>,
) -> AppResult<Json<Value>> {
    if !is_valid_block_id(&input.block_id) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown block id: {}",
            input.block_id
        ))));
    }
    let status = GateStatus::parse(&input.status).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown gate status: {}",
            input.status
        )))
    })?;

    let session = resolve_session(&state, input.session_id).await?;
    let gate = BlockGateRepo::upsert_status(
        &state.pool,
        session.id,
        &input.block_id,
        status.as_str(),
        status == GateStatus::Open,
        user.user_id,
    )
    .await?;

    tracing::info!(
        session_id = session.id,
        block_id = %gate.block_id,
        status = %gate.status,
        operator = user.user_id,
        "gate status changed"
    );

    Ok(Json(json!({
        "block": {
            "session_id": gate.session_id,
            "block_id": gate.block_id,
            "status": gate.status,
            "opened_at": gate.opened_at,
        }
    })))
}

// ---------------------------------------------------------------------------
// Participant monitor
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/participants?session_id=N
///
/// Every participant with their completion summary, plus per-block
/// completion counts across the listed participants.
pub async fn list_participants(
    RequireOperator(_user): RequireOperator,
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Json<Value>> {
    let rows = ProgressRepo::list_participants(&state.pool, query.session_id).await?;

    let mut block_completion: HashMap<&str, usize> =
        BLOCK_IDS.iter().map(|b| (*b, 0)).collect();

    let participants: Vec<Value> = rows
        .iter()
        .map(|row| {
            let completed = row.completed_blocks.clone().unwrap_or_default();
            for block in &completed {
                if let Some(count) = block_completion.get_mut(block.as_str()) {
                    *count += 1;
                }
            }
            let name = row
                .profile
                .as_ref()
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str());
            json!({
                "user_id": row.user_id,
                "email": row.email,
                "name": name,
                "session_id": row.session_id,
                "completed_blocks": completed,
                "progress_percent": progress_percent(completed.len()),
                "last_updated": row.last_updated,
            })
        })
        .collect();

    Ok(Json(json!({
        "total": participants.len(),
        "participants": participants,
        "block_completion": block_completion,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the session a console request targets.
///
/// An explicit id must exist. Without one, the newest session is used;
/// if none exist at all, a default session is created so the gate board
/// works out of the box on a fresh install.
async fn resolve_session(
    state: &AppState,
    session_id: Option<DbId>,
) -> AppResult<WorkshopSession> {
    if let Some(id) = session_id {
        return SessionRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::NotFound {
                entity: "workshop session",
                key: id.to_string(),
            }));
    }

    if let Some(session) = SessionRepo::find_latest(&state.pool).await? {
        return Ok(session);
    }

    let code = format!("session{}", chrono::Utc::now().format("%Y%m%d"));
    // A concurrent first request may have created it already.
    if let Some(session) = SessionRepo::find_by_code(&state.pool, &code).await? {
        return Ok(session);
    }
    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            name: Some("Default session".to_string()),
            code,
        },
    )
    .await?;
    tracing::info!(session_id = session.id, "created default session");
    Ok(session)
}
