//! The nine fixed workshop blocks and their per-session gate states.
//!
//! Block ids are static: `block_0` is the profile, `block_1`..`block_7`
//! map to the step payloads, `block_8` is the read-only summary. Gate
//! state is a free-form toggle board -- operators may move between any
//! two statuses; there is no enforced ordering.

use serde::{Deserialize, Serialize};

/// All block identifiers, in workshop order.
pub const BLOCK_IDS: [&str; 9] = [
    "block_0", "block_1", "block_2", "block_3", "block_4", "block_5", "block_6", "block_7",
    "block_8",
];

/// Fixed total used as the denominator for progress percentages.
pub const TOTAL_BLOCKS: usize = BLOCK_IDS.len();

/// The block completed by saving the profile.
pub const BLOCK_PROFILE: &str = "block_0";

pub fn is_valid_block_id(block_id: &str) -> bool {
    BLOCK_IDS.contains(&block_id)
}

/// The block id completed by saving step `step` (1..=7).
///
/// # Panics
///
/// Panics if `step` is outside `1..=7`; step numbers are static at every
/// call site.
pub fn block_for_step(step: usize) -> &'static str {
    assert!((1..=7).contains(&step), "step must be in 1..=7");
    BLOCK_IDS[step]
}

/// Operator-controlled visibility state of a block within a session.
///
/// Any (session, block) pair without a stored row defaults to `Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Locked,
    Preview,
    Open,
    Closed,
}

impl GateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GateStatus::Locked => "LOCKED",
            GateStatus::Preview => "PREVIEW",
            GateStatus::Open => "OPEN",
            GateStatus::Closed => "CLOSED",
        }
    }

    /// Parse a stored or submitted status string. Returns `None` for
    /// anything outside the four-value enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOCKED" => Some(GateStatus::Locked),
            "PREVIEW" => Some(GateStatus::Preview),
            "OPEN" => Some(GateStatus::Open),
            "CLOSED" => Some(GateStatus::Closed),
            _ => None,
        }
    }
}

/// Percentage of blocks completed, rounded to the nearest integer.
///
/// The denominator is always [`TOTAL_BLOCKS`], not the number of blocks
/// currently open.
pub fn progress_percent(completed_count: usize) -> i32 {
    ((completed_count as f64 / TOTAL_BLOCKS as f64) * 100.0).round() as i32
}
