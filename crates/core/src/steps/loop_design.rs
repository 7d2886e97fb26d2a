//! Step 6: the will / must / can loop design.
//!
//! Five independent free-text fields with shallow field-by-field merge.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Stored step-6 slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step6Data {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_loop: Option<String>,
}

/// Request body for `PATCH /workshop/me/step6`.
#[derive(Debug, Default, Deserialize)]
pub struct Step6Patch {
    #[serde(default, deserialize_with = "lenient")]
    pub will: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub must: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub can: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub loop_description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub ideal_loop: Option<String>,
}

impl Step6Data {
    pub fn merge(current: Option<Self>, patch: Step6Patch) -> Self {
        let current = current.unwrap_or_default();
        Step6Data {
            will: patch.will.or(current.will),
            must: patch.must.or(current.must),
            can: patch.can.or(current.can),
            loop_description: patch.loop_description.or(current.loop_description),
            ideal_loop: patch.ideal_loop.or(current.ideal_loop),
        }
    }

    /// Saving this step always completes its block.
    pub fn is_complete(&self) -> bool {
        true
    }
}
