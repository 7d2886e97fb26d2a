//! Repository for the `participant_progress` table.
//!
//! Writes follow last-write-wins semantics: every mutation bumps
//! `last_updated`, and the merged payload plus the full completed-block
//! set are written in one statement.

use atelier_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::progress::{ParticipantProgress, ParticipantSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, session_id, profile, \
                       step1, step2, step3, step4, step5, step6, step7, \
                       completed_blocks, last_updated";

/// Static column name for a step number; step columns must never be
/// interpolated from request input.
fn step_column(step: usize) -> &'static str {
    match step {
        1 => "step1",
        2 => "step2",
        3 => "step3",
        4 => "step4",
        5 => "step5",
        6 => "step6",
        7 => "step7",
        _ => unreachable!("step numbers are static at call sites"),
    }
}

/// Provides CRUD operations for participant progress records.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Find the progress record for a user.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<ParticipantProgress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participant_progress WHERE user_id = $1");
        sqlx::query_as::<_, ParticipantProgress>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert an empty progress record for a user.
    ///
    /// Concurrent creation races on `uq_participant_progress_user`; the
    /// conflict clause makes the duplicate insert return the existing row.
    pub async fn create_empty(
        pool: &PgPool,
        user_id: DbId,
        session_id: Option<DbId>,
    ) -> Result<ParticipantProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO participant_progress (user_id, session_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParticipantProgress>(&query)
            .bind(user_id)
            .bind(session_id)
            .fetch_one(pool)
            .await
    }

    /// Attach the participant to a session, creating the progress record
    /// if it does not exist yet.
    pub async fn upsert_session(
        pool: &PgPool,
        user_id: DbId,
        session_id: DbId,
    ) -> Result<ParticipantProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO participant_progress (user_id, session_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE
                 SET session_id = EXCLUDED.session_id, last_updated = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParticipantProgress>(&query)
            .bind(user_id)
            .bind(session_id)
            .fetch_one(pool)
            .await
    }

    /// Write the merged profile and the updated completed-block set.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: DbId,
        profile: &Value,
        completed_blocks: &[String],
    ) -> Result<Option<ParticipantProgress>, sqlx::Error> {
        let query = format!(
            "UPDATE participant_progress
             SET profile = $2, completed_blocks = $3, last_updated = NOW()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParticipantProgress>(&query)
            .bind(user_id)
            .bind(profile)
            .bind(completed_blocks)
            .fetch_optional(pool)
            .await
    }

    /// Write a merged step slot and the updated completed-block set.
    pub async fn update_step(
        pool: &PgPool,
        user_id: DbId,
        step: usize,
        payload: &Value,
        completed_blocks: &[String],
    ) -> Result<Option<ParticipantProgress>, sqlx::Error> {
        let column = step_column(step);
        let query = format!(
            "UPDATE participant_progress
             SET {column} = $2, completed_blocks = $3, last_updated = NOW()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParticipantProgress>(&query)
            .bind(user_id)
            .bind(payload)
            .bind(completed_blocks)
            .fetch_optional(pool)
            .await
    }

    /// List participants with their progress summaries, oldest-first,
    /// optionally filtered to one session.
    pub async fn list_participants(
        pool: &PgPool,
        session_id: Option<DbId>,
    ) -> Result<Vec<ParticipantSummary>, sqlx::Error> {
        sqlx::query_as::<_, ParticipantSummary>(
            "SELECT u.id AS user_id, u.email, p.session_id, p.profile,
                    p.completed_blocks, p.last_updated
             FROM users u
             LEFT JOIN participant_progress p ON p.user_id = u.id
             WHERE u.role = 'participant'
               AND ($1::BIGINT IS NULL OR p.session_id = $1)
             ORDER BY u.created_at ASC, u.id ASC",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }
}
