//! Repository for the `workshop_sessions` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::workshop_session::{CreateSession, SessionWithCount, WorkshopSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, is_active, created_at";

/// Provides CRUD operations for workshop sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    ///
    /// A duplicate code violates `uq_workshop_sessions_code`; callers rely
    /// on the error classification to surface that as a conflict.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<WorkshopSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO workshop_sessions (name, code)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkshopSession>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .fetch_one(pool)
            .await
    }

    /// Find a session by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkshopSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workshop_sessions WHERE id = $1");
        sqlx::query_as::<_, WorkshopSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a session by its join code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<WorkshopSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workshop_sessions WHERE code = $1");
        sqlx::query_as::<_, WorkshopSession>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// The most recently created session, if any.
    pub async fn find_latest(pool: &PgPool) -> Result<Option<WorkshopSession>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM workshop_sessions ORDER BY created_at DESC, id DESC LIMIT 1");
        sqlx::query_as::<_, WorkshopSession>(&query)
            .fetch_optional(pool)
            .await
    }

    /// List all sessions newest-first, each with its participant count.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<SessionWithCount>, sqlx::Error> {
        sqlx::query_as::<_, SessionWithCount>(
            "SELECT s.id, s.name, s.code, s.is_active, s.created_at,
                    COUNT(p.id) AS participant_count
             FROM workshop_sessions s
             LEFT JOIN participant_progress p ON p.session_id = s.id
             GROUP BY s.id
             ORDER BY s.created_at DESC, s.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Set the active flag. Idempotent; returns the updated row, or `None`
    /// if no session with the given id exists.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<WorkshopSession>, sqlx::Error> {
        let query = format!(
            "UPDATE workshop_sessions SET is_active = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkshopSession>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }
}
