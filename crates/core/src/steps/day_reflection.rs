//! Step 4: the day-one free-text reflection.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Stored step-4 slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step4Data {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day1_comment: Option<String>,
}

/// Request body for `PATCH /workshop/me/step4`.
#[derive(Debug, Default, Deserialize)]
pub struct Step4Patch {
    #[serde(default, deserialize_with = "lenient")]
    pub day1_comment: Option<String>,
}

impl Step4Data {
    pub fn merge(current: Option<Self>, patch: Step4Patch) -> Self {
        let current = current.unwrap_or_default();
        Step4Data {
            day1_comment: patch.day1_comment.or(current.day1_comment),
        }
    }

    /// Saving this step always completes its block, even with empty text.
    pub fn is_complete(&self) -> bool {
        true
    }
}
