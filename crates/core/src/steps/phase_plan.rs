//! Step 7: the three-phase transition plan.
//!
//! The stored plan always has exactly [`PHASE_COUNT`] phases: a submitted
//! list is truncated to three and missing slots are filled with defaults,
//! so downstream rendering never has to handle a variable-length plan.

use serde::{Deserialize, Serialize};

use super::lenient;

pub const PHASE_COUNT: usize = 3;
pub const MAX_KEY_ACTIONS: usize = 3;
pub const DEFAULT_DURATION_MONTHS: i64 = 12;
pub const MAX_DURATION_MONTHS: i64 = 60;

/// One phase of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase_number: i64,
    pub name: String,
    pub duration_months: i64,
    pub increase_work: Vec<String>,
    pub decrease_work: Vec<String>,
    pub key_actions: Vec<String>,
    pub success_definition: String,
}

impl Phase {
    fn empty(phase_number: i64) -> Self {
        Phase {
            phase_number,
            name: String::new(),
            duration_months: DEFAULT_DURATION_MONTHS,
            increase_work: Vec::new(),
            decrease_work: Vec::new(),
            key_actions: Vec::new(),
            success_definition: String::new(),
        }
    }
}

/// Stored step-7 slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step7Data {
    pub phases: Vec<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_step: Option<String>,
}

impl Default for Step7Data {
    fn default() -> Self {
        Step7Data {
            phases: (1..=PHASE_COUNT as i64).map(Phase::empty).collect(),
            first_step: None,
        }
    }
}

/// Request body for `PATCH /workshop/me/step7`.
#[derive(Debug, Default, Deserialize)]
pub struct Step7Patch {
    #[serde(default, deserialize_with = "lenient")]
    pub phases: Option<Vec<PhaseInput>>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_step: Option<String>,
}

/// Raw phase as submitted; every field tolerates absence.
#[derive(Debug, Default, Deserialize)]
pub struct PhaseInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub duration_months: Option<f64>,
    #[serde(default)]
    pub increase_work: Vec<String>,
    #[serde(default)]
    pub decrease_work: Vec<String>,
    #[serde(default)]
    pub key_actions: Vec<String>,
    #[serde(default)]
    pub success_definition: String,
}

fn sanitize_duration(v: Option<f64>) -> i64 {
    match v {
        Some(v) if v.is_finite() && v > 0.0 => (v.round() as i64).clamp(1, MAX_DURATION_MONTHS),
        _ => DEFAULT_DURATION_MONTHS,
    }
}

fn sanitize_phase(input: PhaseInput, phase_number: i64) -> Phase {
    let mut key_actions = input.key_actions;
    key_actions.truncate(MAX_KEY_ACTIONS);
    Phase {
        phase_number,
        name: input.name,
        duration_months: sanitize_duration(input.duration_months),
        increase_work: input.increase_work,
        decrease_work: input.decrease_work,
        key_actions,
        success_definition: input.success_definition,
    }
}

impl Step7Data {
    /// Apply a patch. A submitted phase list replaces the stored one,
    /// forced to exactly three phases numbered 1..=3.
    pub fn merge(current: Option<Self>, patch: Step7Patch) -> Self {
        let current = current.unwrap_or_default();
        let phases = match patch.phases {
            None => current.phases,
            Some(inputs) => {
                let mut inputs = inputs.into_iter();
                (1..=PHASE_COUNT as i64)
                    .map(|n| match inputs.next() {
                        Some(input) => sanitize_phase(input, n),
                        None => Phase::empty(n),
                    })
                    .collect()
            }
        };
        Step7Data {
            phases,
            first_step: patch.first_step.or(current.first_step),
        }
    }

    /// Saving this step always completes its block.
    pub fn is_complete(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_input(name: &str, duration: f64, actions: &[&str]) -> PhaseInput {
        PhaseInput {
            name: name.to_string(),
            duration_months: Some(duration),
            key_actions: actions.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn plan_is_forced_to_three_phases() {
        let data = Step7Data::merge(
            None,
            Step7Patch {
                phases: Some(vec![phase_input("explore", 6.0, &[])]),
                ..Default::default()
            },
        );
        assert_eq!(data.phases.len(), 3);
        assert_eq!(data.phases[0].name, "explore");
        assert_eq!(data.phases[1].phase_number, 2);
        assert_eq!(data.phases[2].duration_months, DEFAULT_DURATION_MONTHS);
    }

    #[test]
    fn extra_phases_are_truncated() {
        let inputs = (0..5).map(|i| phase_input(&format!("p{i}"), 3.0, &[])).collect();
        let data = Step7Data::merge(
            None,
            Step7Patch {
                phases: Some(inputs),
                ..Default::default()
            },
        );
        assert_eq!(data.phases.len(), 3);
        assert_eq!(data.phases[2].name, "p2");
    }

    #[test]
    fn durations_clamp_and_default() {
        let data = Step7Data::merge(
            None,
            Step7Patch {
                phases: Some(vec![
                    phase_input("a", 200.0, &[]),
                    phase_input("b", 0.0, &[]),
                    phase_input("c", 0.4, &[]),
                ]),
                ..Default::default()
            },
        );
        assert_eq!(data.phases[0].duration_months, MAX_DURATION_MONTHS);
        assert_eq!(data.phases[1].duration_months, DEFAULT_DURATION_MONTHS);
        // Positive but rounds to zero: clamped up to the 1-month floor.
        assert_eq!(data.phases[2].duration_months, 1);
    }

    #[test]
    fn key_actions_truncate_but_never_pad() {
        let data = Step7Data::merge(
            None,
            Step7Patch {
                phases: Some(vec![phase_input("a", 12.0, &["one", "two", "three", "four"])]),
                ..Default::default()
            },
        );
        assert_eq!(data.phases[0].key_actions, vec!["one", "two", "three"]);
        assert!(data.phases[1].key_actions.is_empty());
    }
}
