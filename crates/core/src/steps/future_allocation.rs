//! Step 3: the desired future allocation across the four portfolio buckets.
//!
//! Three buckets are entered directly (with fixed per-bucket maxima); the
//! A bucket is the remainder. After clamping, the 4-tuple is re-normalized
//! with the last-bucket-remainder correction so it sums to exactly 100.

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::allocation::normalize_exact;

/// Per-bucket entry maxima: D (study) 50, C (gift) 40, B (home) 40.
pub const MAX_FUTURE_D: f64 = 50.0;
pub const MAX_FUTURE_C: f64 = 40.0;
pub const MAX_FUTURE_B: f64 = 40.0;

/// Stored step-3 slot. Percentages always sum to 100.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step3Data {
    pub future_a: i64,
    pub future_b: i64,
    pub future_c: i64,
    pub future_d: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will_do: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will_quit: Option<String>,
}

/// Request body for `PATCH /workshop/me/step3`.
#[derive(Debug, Default, Deserialize)]
pub struct Step3Patch {
    #[serde(default, deserialize_with = "lenient")]
    pub future_d: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub future_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub future_b: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub will_do: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub will_quit: Option<String>,
}

fn clamp(v: f64, max: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, max)
    } else {
        0.0
    }
}

impl Step3Data {
    /// Apply a patch. Absent percentage fields fall back to the stored
    /// value; the A bucket is recomputed as the remainder every time.
    pub fn merge(current: Option<Self>, patch: Step3Patch) -> Self {
        let current = current.unwrap_or_default();

        let d = clamp(patch.future_d.unwrap_or(current.future_d as f64), MAX_FUTURE_D);
        let c = clamp(patch.future_c.unwrap_or(current.future_c as f64), MAX_FUTURE_C);
        let b = clamp(patch.future_b.unwrap_or(current.future_b as f64), MAX_FUTURE_B);
        let a = (100.0 - d - c - b).clamp(0.0, 100.0);

        // A is the remainder bucket, so it goes last in the exact style.
        let [future_d, future_c, future_b, future_a] = normalize_exact([d, c, b, a]);

        Step3Data {
            future_a,
            future_b,
            future_c,
            future_d,
            will_do: patch.will_do.or(current.will_do),
            will_quit: patch.will_quit.or(current.will_quit),
        }
    }

    /// Saving this step always completes its block.
    pub fn is_complete(&self) -> bool {
        true
    }
}
