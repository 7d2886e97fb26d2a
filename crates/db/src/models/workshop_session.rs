//! Workshop session (cohort) model and DTOs.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A cohort row from the `workshop_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkshopSession {
    pub id: DbId,
    pub name: Option<String>,
    pub code: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// A session annotated with its participant count, for the admin list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionWithCount {
    pub id: DbId,
    pub name: Option<String>,
    pub code: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub participant_count: i64,
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub name: Option<String>,
    pub code: String,
}
