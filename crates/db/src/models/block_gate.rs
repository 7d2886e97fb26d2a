//! Block gate model.

use atelier_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A gate row from the `block_gates` table.
///
/// Status is stored as TEXT and parsed into
/// [`atelier_core::blocks::GateStatus`] at the API boundary; (session,
/// block) pairs without a row are LOCKED by default and never stored.
#[derive(Debug, Clone, FromRow)]
pub struct BlockGate {
    pub id: DbId,
    pub session_id: DbId,
    pub block_id: String,
    pub status: String,
    pub opened_at: Option<Timestamp>,
    pub opened_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
