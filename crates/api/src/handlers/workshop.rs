//! Handlers for the `/workshop` resource: anonymous start, session join,
//! the progress record, and the per-step save endpoints.
//!
//! Step saves share one shape: load the stored slot, merge the patch
//! through the typed rules in `atelier_core::steps`, recompute the
//! completed-block set, and write slot + set in a single statement.
//! Completion is monotone -- a block once completed never leaves the set,
//! even if a later save would no longer satisfy the completion rule.

use atelier_core::blocks::{block_for_step, progress_percent, BLOCK_PROFILE};
use atelier_core::classify::classify_with_fallback;
use atelier_core::error::CoreError;
use atelier_core::roles::ROLE_PARTICIPANT;
use atelier_core::steps::capital_audit::{Step5Data, Step5Patch};
use atelier_core::steps::classification::{Step2Data, Step2Patch};
use atelier_core::steps::day_reflection::{Step4Data, Step4Patch};
use atelier_core::steps::future_allocation::{Step3Data, Step3Patch};
use atelier_core::steps::loop_design::{Step6Data, Step6Patch};
use atelier_core::steps::phase_plan::{Step7Data, Step7Patch};
use atelier_core::steps::profile::{ProfileData, ProfilePatch};
use atelier_core::steps::time_inventory::{Step1Data, Step1Patch};
use atelier_core::types::{DbId, Timestamp};
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use atelier_db::models::progress::ParticipantProgress;
use atelier_db::models::user::{CreateUser, GUEST_SENTINEL};
use atelier_db::repositories::{ProgressRepo, SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::{establish_session, AuthResponse};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /workshop/join`.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub code: String,
}

/// The full progress record as returned by `GET /workshop/me`.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: Option<DbId>,
    pub profile: Option<Value>,
    pub step1: Option<Value>,
    pub step2: Option<Value>,
    pub step3: Option<Value>,
    pub step4: Option<Value>,
    pub step5: Option<Value>,
    pub step6: Option<Value>,
    pub step7: Option<Value>,
    pub completed_blocks: Vec<String>,
    pub progress_percent: i32,
    pub last_updated: Timestamp,
}

impl From<ParticipantProgress> for ProgressResponse {
    fn from(p: ParticipantProgress) -> Self {
        let progress_percent = progress_percent(p.completed_blocks.len());
        ProgressResponse {
            id: p.id,
            user_id: p.user_id,
            session_id: p.session_id,
            profile: p.profile,
            step1: p.step1,
            step2: p.step2,
            step3: p.step3,
            step4: p.step4,
            step5: p.step5,
            step6: p.step6,
            step7: p.step7,
            completed_blocks: p.completed_blocks,
            progress_percent,
            last_updated: p.last_updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/workshop/start
///
/// Begin the workshop anonymously. Creates a guest participant (no
/// credentials; the password-hash sentinel blocks credential login) plus
/// an empty progress record, and establishes a session.
pub async fn start(
    State(state): State<AppState>,
) -> AppResult<(
    StatusCode,
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<AuthResponse>,
)> {
    let email = format!("guest-{}@guest.atelier.local", Uuid::new_v4());

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash: GUEST_SENTINEL.to_string(),
            role: ROLE_PARTICIPANT.to_string(),
        },
    )
    .await?;

    ProgressRepo::create_empty(&state.pool, user.id, None).await?;
    tracing::info!(user_id = user.id, "started anonymous workshop participant");

    let (cookie, response) = establish_session(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(response),
    ))
}

/// POST /api/v1/workshop/join
///
/// Attach the authenticated participant to a session by its join code.
pub async fn join(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<JoinRequest>,
) -> AppResult<Json<Value>> {
    let code = input.code.trim();
    if code.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Session code is required".into(),
        )));
    }

    let session = SessionRepo::find_by_code(&state.pool, code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "workshop session",
                key: code.to_string(),
            })
        })?;
    if !session.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Session is not active".into(),
        )));
    }

    let progress = ProgressRepo::upsert_session(&state.pool, user.user_id, session.id).await?;
    tracing::info!(user_id = user.user_id, session_id = session.id, "joined session");

    Ok(Json(json!({
        "session": session,
        "progress": ProgressResponse::from(progress),
    })))
}

/// GET /api/v1/workshop/me
///
/// The caller's progress record, created on first read.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<ProgressResponse>> {
    if let Some(progress) = ProgressRepo::find_by_user(&state.pool, user.user_id).await? {
        return Ok(Json(progress.into()));
    }

    // Lazy creation; a valid token for a deleted user must not
    // resurrect a row.
    if UserRepo::find_by_id(&state.pool, user.user_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "user",
            key: user.user_id.to_string(),
        }));
    }

    let progress = ProgressRepo::create_empty(&state.pool, user.user_id, None).await?;
    Ok(Json(progress.into()))
}

/// PATCH /api/v1/workshop/me/profile
///
/// Merge profile fields. Saving the profile always completes `block_0`,
/// regardless of which fields were filled.
pub async fn save_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<ProfilePatch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;

    let merged = ProfileData::merge(decode_slot(progress.profile.as_ref()), patch);
    let value = encode_slot(&merged)?;
    let completed = completed_with(progress.completed_blocks, true, BLOCK_PROFILE);

    let updated = ProgressRepo::update_profile(&state.pool, user.user_id, &value, &completed)
        .await?
        .ok_or_else(|| progress_not_found(&user))?;

    Ok(Json(json!({
        "profile": value,
        "completed_blocks": updated.completed_blocks,
        "progress_percent": progress_percent(updated.completed_blocks.len()),
    })))
}

/// PATCH /api/v1/workshop/me/step1 -- the time-use inventory.
pub async fn save_step1(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<Step1Patch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;
    let merged = Step1Data::merge(decode_slot(progress.step1.as_ref()), patch);
    persist_step(&state, &user, 1, &encode_slot(&merged)?, merged.is_complete(), progress).await
}

/// PATCH /api/v1/workshop/me/step2 -- activity classification review.
pub async fn save_step2(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<Step2Patch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;
    let merged = Step2Data::merge(decode_slot(progress.step2.as_ref()), patch);
    persist_step(&state, &user, 2, &encode_slot(&merged)?, merged.is_complete(), progress).await
}

/// PATCH /api/v1/workshop/me/step3 -- future time allocation.
pub async fn save_step3(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<Step3Patch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;
    let merged = Step3Data::merge(decode_slot(progress.step3.as_ref()), patch);
    persist_step(&state, &user, 3, &encode_slot(&merged)?, merged.is_complete(), progress).await
}

/// PATCH /api/v1/workshop/me/step4 -- day-one reflection.
pub async fn save_step4(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<Step4Patch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;
    let merged = Step4Data::merge(decode_slot(progress.step4.as_ref()), patch);
    persist_step(&state, &user, 4, &encode_slot(&merged)?, merged.is_complete(), progress).await
}

/// PATCH /api/v1/workshop/me/step5 -- the three-capital audit.
pub async fn save_step5(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<Step5Patch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;
    let merged = Step5Data::merge(decode_slot(progress.step5.as_ref()), patch);
    persist_step(&state, &user, 5, &encode_slot(&merged)?, merged.is_complete(), progress).await
}

/// PATCH /api/v1/workshop/me/step6 -- the will/must/can loop design.
pub async fn save_step6(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<Step6Patch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;
    let merged = Step6Data::merge(decode_slot(progress.step6.as_ref()), patch);
    persist_step(&state, &user, 6, &encode_slot(&merged)?, merged.is_complete(), progress).await
}

/// PATCH /api/v1/workshop/me/step7 -- the three-phase action plan.
pub async fn save_step7(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<Step7Patch>,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;
    let merged = Step7Data::merge(decode_slot(progress.step7.as_ref()), patch);
    persist_step(&state, &user, 7, &encode_slot(&merged)?, merged.is_complete(), progress).await
}

/// POST /api/v1/workshop/me/step2/classify
///
/// Classify the step-1 activities into the five work categories. Always
/// succeeds once activities exist; classifier failures degrade to the
/// default category per item.
pub async fn classify(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    let progress = require_progress(&state, &user).await?;

    let step1: Step1Data = decode_slot(progress.step1.as_ref()).unwrap_or_default();
    if step1.activities.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No activities to classify; save step 1 first".into(),
        )));
    }

    let classified = classify_with_fallback(state.classifier.as_ref(), &step1.activities).await;
    Ok(Json(json!({ "classifications": classified })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the caller's progress record; step saves do not lazily create.
async fn require_progress(state: &AppState, user: &AuthUser) -> AppResult<ParticipantProgress> {
    ProgressRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| progress_not_found(user))
}

fn progress_not_found(user: &AuthUser) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "participant progress",
        key: user.user_id.to_string(),
    })
}

/// Decode a stored JSONB slot into its typed shape. A slot that fails to
/// decode (schema drift) is treated as empty rather than erroring.
fn decode_slot<T: serde::de::DeserializeOwned>(slot: Option<&Value>) -> Option<T> {
    slot.and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn encode_slot<T: Serialize>(data: &T) -> AppResult<Value> {
    serde_json::to_value(data).map_err(|e| AppError::InternalError(format!("Slot encoding: {e}")))
}

/// The completed-block set after a save. Monotone: blocks are added,
/// never removed.
fn completed_with(mut blocks: Vec<String>, complete: bool, block_id: &str) -> Vec<String> {
    if complete && !blocks.iter().any(|b| b == block_id) {
        blocks.push(block_id.to_string());
    }
    blocks
}

/// Write a merged step slot and return the standard save response.
async fn persist_step(
    state: &AppState,
    user: &AuthUser,
    step: usize,
    value: &Value,
    complete: bool,
    progress: ParticipantProgress,
) -> AppResult<Json<Value>> {
    let completed = completed_with(progress.completed_blocks, complete, block_for_step(step));

    let updated = ProgressRepo::update_step(&state.pool, user.user_id, step, value, &completed)
        .await?
        .ok_or_else(|| progress_not_found(user))?;

    let mut body = serde_json::Map::new();
    body.insert(format!("step{step}"), value.clone());
    body.insert("completed_blocks".into(), json!(updated.completed_blocks));
    body.insert(
        "progress_percent".into(),
        json!(progress_percent(updated.completed_blocks.len())),
    );
    Ok(Json(Value::Object(body)))
}
