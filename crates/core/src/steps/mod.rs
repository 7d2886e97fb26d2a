//! Typed step payloads.
//!
//! Each workshop step stores one named slot on the participant's progress
//! record. Every slot is a concrete struct (not a dynamic map): the module
//! for each step defines the stored `*Data` shape, the `*Patch` request
//! shape, a `merge` that applies sanitization rules, and the step's
//! completion rule.
//!
//! Merge semantics are additive and idempotent: re-saving identical data
//! yields the same stored value, and fields absent from a patch keep their
//! current value (lists are replaced wholesale when submitted).

pub mod capital_audit;
pub mod classification;
pub mod day_reflection;
pub mod future_allocation;
pub mod loop_design;
pub mod phase_plan;
pub mod profile;
pub mod time_inventory;

use serde::{Deserialize, Deserializer};

/// Deserialize a field leniently: a present-but-wrong-typed value becomes
/// `None` instead of failing the whole body.
///
/// Patch bodies tolerate junk per field -- an invalid field is silently
/// dropped while the rest of the patch still applies.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Clamp an hour value to the valid range, mapping non-finite input to 0.
pub(crate) fn clamp_hours(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, time_inventory::MAX_HOURS)
    } else {
        0.0
    }
}

/// Trim and truncate a free-text description to the storage limit.
pub(crate) fn clean_description(s: &str) -> String {
    s.trim().chars().take(time_inventory::MAX_DESCRIPTION_CHARS).collect()
}
