//! Participant progress model.
//!
//! The step slots are stored as JSONB and surfaced as raw
//! `serde_json::Value`s here; the api crate deserializes them into the
//! typed step structs from `atelier_core::steps`.

use atelier_core::types::{DbId, Timestamp};
use serde_json::Value;
use sqlx::FromRow;

/// A progress row from the `participant_progress` table.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantProgress {
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
    pub last_updated: Timestamp,
}

impl ParticipantProgress {
    /// The stored slot for a given step number (1..=7).
    pub fn step_slot(&self, step: usize) -> Option<&Value> {
        match step {
            1 => self.step1.as_ref(),
            2 => self.step2.as_ref(),
            3 => self.step3.as_ref(),
            4 => self.step4.as_ref(),
            5 => self.step5.as_ref(),
            6 => self.step6.as_ref(),
            7 => self.step7.as_ref(),
            _ => None,
        }
    }
}

/// One participant with their progress summary, as listed on the admin
/// dashboard. Produced by a LEFT JOIN, so progress fields are optional.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantSummary {
    pub user_id: DbId,
    pub email: String,
    pub session_id: Option<DbId>,
    pub profile: Option<Value>,
    pub completed_blocks: Option<Vec<String>>,
    pub last_updated: Option<Timestamp>,
}
