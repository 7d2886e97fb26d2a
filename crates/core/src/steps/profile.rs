//! The participant profile (block 0).
//!
//! Free-form attributes set once and amended thereafter. Merge is
//! field-by-field: only present, correctly-typed fields are applied;
//! anything else is silently dropped. Saving the profile always completes
//! `block_0`, regardless of which fields were filled.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Accepted age brackets.
pub const AGE_GROUPS: [&str; 3] = ["40s", "50s", "60s"];

/// The fixed set of selectable feelings about starting the workshop.
pub const INITIAL_FEELINGS: [&str; 5] =
    ["anxious", "hopeful", "reluctant", "excited", "uncertain"];

/// Stored profile slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_service: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_feeling: Option<Vec<String>>,
}

/// Request body for `PATCH /workshop/me/profile`.
#[derive(Debug, Default, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub age_group: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub years_of_service: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub initial_feeling: Option<Vec<String>>,
}

impl ProfileData {
    pub fn merge(current: Option<Self>, patch: ProfilePatch) -> Self {
        let current = current.unwrap_or_default();

        // Enum-like fields are only applied when the value is in the
        // accepted set; otherwise the field is dropped, not rejected.
        let age_group = patch
            .age_group
            .filter(|g| AGE_GROUPS.contains(&g.as_str()))
            .or(current.age_group);
        let initial_feeling = patch
            .initial_feeling
            .filter(|fs| fs.iter().all(|f| INITIAL_FEELINGS.contains(&f.as_str())))
            .or(current.initial_feeling);

        ProfileData {
            name: patch.name.or(current.name),
            age_group,
            role: patch.role.or(current.role),
            years_of_service: patch.years_of_service.or(current.years_of_service),
            initial_feeling,
        }
    }
}
