//! Step 1: the time-use inventory.
//!
//! Participants list free-text activities with weekly hours. The server
//! drops entirely empty rows, clamps hours, truncates descriptions, and
//! recomputes the total.

use serde::{Deserialize, Serialize};

use super::{clamp_hours, clean_description, lenient};

/// Upper bound for a single activity's hours.
pub const MAX_HOURS: f64 = 500.0;

/// Maximum stored description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// One activity row: what the participant spends time on, and how much.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub hours: f64,
}

/// Stored step-1 slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step1Data {
    pub activities: Vec<Activity>,
    /// Sum of all activity hours, recomputed on every save.
    pub total: f64,
}

/// Request body for `PATCH /workshop/me/step1`.
#[derive(Debug, Default, Deserialize)]
pub struct Step1Patch {
    #[serde(default, deserialize_with = "lenient")]
    pub activities: Option<Vec<ActivityInput>>,
}

/// Raw activity row as submitted; both fields tolerate absence.
#[derive(Debug, Deserialize)]
pub struct ActivityInput {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hours: f64,
}

impl Step1Data {
    /// Apply a patch. A submitted activity list replaces the stored one
    /// wholesale; rows that are empty in both fields are dropped.
    pub fn merge(current: Option<Self>, patch: Step1Patch) -> Self {
        match patch.activities {
            None => current.unwrap_or_default(),
            Some(rows) => {
                let activities: Vec<Activity> = rows
                    .into_iter()
                    .map(|r| Activity {
                        description: clean_description(&r.description),
                        hours: clamp_hours(r.hours),
                    })
                    .filter(|a| !a.description.is_empty() || a.hours > 0.0)
                    .collect();
                let total = activities.iter().map(|a| a.hours).sum();
                Step1Data { activities, total }
            }
        }
    }

    /// Complete once at least one activity with positive hours exists.
    pub fn is_complete(&self) -> bool {
        !self.activities.is_empty() && self.total > 0.0
    }
}
