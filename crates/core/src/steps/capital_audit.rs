//! Step 5: the capital self-audit (human / social / financial).
//!
//! Merging is deep per dimension: each field takes the patched value if
//! present, else the stored value, else the default. Scores are integers
//! clamped to [1,5] and default to 3 when absent or invalid.

use serde::{Deserialize, Serialize};

use super::lenient;

pub const DEFAULT_SCORE: i64 = 3;

fn default_score() -> i64 {
    DEFAULT_SCORE
}

/// Clamp a submitted score to [1,5]; invalid input falls back to the default.
fn sanitize_score(v: Option<f64>, fallback: i64) -> i64 {
    match v {
        Some(v) if v.is_finite() => (v.round() as i64).clamp(1, 5),
        Some(_) => DEFAULT_SCORE,
        None => fallback.clamp(1, 5),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanCapital {
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub growth: String,
    #[serde(default = "default_score")]
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialCapital {
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub community: String,
    #[serde(default = "default_score")]
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialCapital {
    #[serde(default)]
    pub other_income: bool,
    #[serde(default)]
    pub detail: String,
}

impl Default for HumanCapital {
    fn default() -> Self {
        HumanCapital {
            strengths: String::new(),
            growth: String::new(),
            score: DEFAULT_SCORE,
        }
    }
}

impl Default for SocialCapital {
    fn default() -> Self {
        SocialCapital {
            network: String::new(),
            community: String::new(),
            score: DEFAULT_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Capitals {
    #[serde(default)]
    pub human: HumanCapital,
    #[serde(default)]
    pub social: SocialCapital,
    #[serde(default)]
    pub financial: FinancialCapital,
}

/// Stored step-5 slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step5Data {
    pub capitals: Capitals,
}

/// Request body for `PATCH /workshop/me/step5`. Flat field names, one per
/// dimension sub-field, matching the form layout.
#[derive(Debug, Default, Deserialize)]
pub struct Step5Patch {
    #[serde(default, deserialize_with = "lenient")]
    pub human_strengths: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub human_growth: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub human_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub social_network: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub social_community: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub social_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub financial_other_income: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub financial_detail: Option<String>,
}

impl Step5Data {
    pub fn merge(current: Option<Self>, patch: Step5Patch) -> Self {
        let current = current.unwrap_or_default().capitals;
        Step5Data {
            capitals: Capitals {
                human: HumanCapital {
                    strengths: patch.human_strengths.unwrap_or(current.human.strengths),
                    growth: patch.human_growth.unwrap_or(current.human.growth),
                    score: sanitize_score(patch.human_score, current.human.score),
                },
                social: SocialCapital {
                    network: patch.social_network.unwrap_or(current.social.network),
                    community: patch.social_community.unwrap_or(current.social.community),
                    score: sanitize_score(patch.social_score, current.social.score),
                },
                financial: FinancialCapital {
                    other_income: patch
                        .financial_other_income
                        .unwrap_or(current.financial.other_income),
                    detail: patch.financial_detail.unwrap_or(current.financial.detail),
                },
            },
        }
    }

    /// Saving this step always completes its block.
    pub fn is_complete(&self) -> bool {
        true
    }
}
