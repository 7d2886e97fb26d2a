//! Repository for the `block_gates` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::block_gate::BlockGate;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, session_id, block_id, status, opened_at, opened_by, created_at, updated_at";

/// Provides gate reads and upserts.
pub struct BlockGateRepo;

impl BlockGateRepo {
    /// All stored gate rows for a session. Blocks without a row are
    /// implicitly LOCKED and simply absent here.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<BlockGate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM block_gates WHERE session_id = $1");
        sqlx::query_as::<_, BlockGate>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Upsert the status of one (session, block) pair.
    ///
    /// When `stamp_open` is set (transition into OPEN) the opened_at
    /// timestamp and acting operator are recorded; otherwise any existing
    /// opened_at/opened_by values are preserved.
    pub async fn upsert_status(
        pool: &PgPool,
        session_id: DbId,
        block_id: &str,
        status: &str,
        stamp_open: bool,
        opened_by: DbId,
    ) -> Result<BlockGate, sqlx::Error> {
        let query = format!(
            "INSERT INTO block_gates (session_id, block_id, status, opened_at, opened_by)
             VALUES ($1, $2, $3,
                     CASE WHEN $4 THEN NOW() END,
                     CASE WHEN $4 THEN $5 END)
             ON CONFLICT (session_id, block_id) DO UPDATE SET
                 status = EXCLUDED.status,
                 opened_at = CASE WHEN $4 THEN NOW() ELSE block_gates.opened_at END,
                 opened_by = CASE WHEN $4 THEN $5 ELSE block_gates.opened_by END,
                 updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockGate>(&query)
            .bind(session_id)
            .bind(block_id)
            .bind(status)
            .bind(stamp_open)
            .bind(opened_by)
            .fetch_one(pool)
            .await
    }
}
