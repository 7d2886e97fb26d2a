//! Step 2: categorizing the time inventory into the five work types.
//!
//! Entries carry an optional category; the server recomputes per-category
//! hour totals on every save, ignoring uncategorized entries.

use serde::{Deserialize, Serialize};

use super::{clamp_hours, clean_description, lenient};

/// The five-category portfolio-work taxonomy, serialized as the letters
/// `A`..`E` participants see in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkCategory {
    /// A: paid work -- jobs, side income.
    #[serde(rename = "A")]
    PaidWork,
    /// B: home work -- housework, childcare, caregiving.
    #[serde(rename = "B")]
    HomeWork,
    /// C: gift work -- volunteering, unpaid community contribution.
    #[serde(rename = "C")]
    GiftWork,
    /// D: study work -- learning, qualifications, self-development.
    #[serde(rename = "D")]
    StudyWork,
    /// E: everything else -- commuting, leisure, rest.
    #[serde(rename = "E")]
    Other,
}

/// All categories in taxonomy order.
pub const ALL_CATEGORIES: [WorkCategory; 5] = [
    WorkCategory::PaidWork,
    WorkCategory::HomeWork,
    WorkCategory::GiftWork,
    WorkCategory::StudyWork,
    WorkCategory::Other,
];

impl WorkCategory {
    pub fn as_letter(self) -> &'static str {
        match self {
            WorkCategory::PaidWork => "A",
            WorkCategory::HomeWork => "B",
            WorkCategory::GiftWork => "C",
            WorkCategory::StudyWork => "D",
            WorkCategory::Other => "E",
        }
    }

    pub fn parse_letter(s: &str) -> Option<Self> {
        match s {
            "A" => Some(WorkCategory::PaidWork),
            "B" => Some(WorkCategory::HomeWork),
            "C" => Some(WorkCategory::GiftWork),
            "D" => Some(WorkCategory::StudyWork),
            "E" => Some(WorkCategory::Other),
            _ => None,
        }
    }
}

/// One categorized activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    pub description: String,
    pub hours: f64,
    /// `None` until the participant (or the classifier) assigns a category.
    pub category: Option<WorkCategory>,
}

/// Per-category hour totals, keyed by taxonomy letter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl CategoryTotals {
    fn add(&mut self, category: WorkCategory, hours: f64) {
        match category {
            WorkCategory::PaidWork => self.a += hours,
            WorkCategory::HomeWork => self.b += hours,
            WorkCategory::GiftWork => self.c += hours,
            WorkCategory::StudyWork => self.d += hours,
            WorkCategory::Other => self.e += hours,
        }
    }

    /// Sum hours grouped by category, skipping uncategorized entries.
    pub fn from_entries(entries: &[ClassifiedEntry]) -> Self {
        let mut totals = CategoryTotals::default();
        for entry in entries {
            if let Some(category) = entry.category {
                totals.add(category, entry.hours);
            }
        }
        totals
    }
}

/// Stored step-2 slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step2Data {
    pub entries: Vec<ClassifiedEntry>,
    pub totals: CategoryTotals,
}

/// Request body for `PATCH /workshop/me/step2`.
#[derive(Debug, Default, Deserialize)]
pub struct Step2Patch {
    #[serde(default, deserialize_with = "lenient")]
    pub entries: Option<Vec<EntryInput>>,
}

/// Raw entry as submitted. An unrecognized category string is treated as
/// uncategorized rather than rejected.
#[derive(Debug, Deserialize)]
pub struct EntryInput {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl Step2Data {
    /// Apply a patch. A submitted entry list replaces the stored one;
    /// totals are always recomputed server-side.
    pub fn merge(current: Option<Self>, patch: Step2Patch) -> Self {
        let entries = match patch.entries {
            None => current.map(|c| c.entries).unwrap_or_default(),
            Some(rows) => rows
                .into_iter()
                .map(|r| ClassifiedEntry {
                    description: clean_description(&r.description),
                    hours: clamp_hours(r.hours),
                    category: r.category.as_deref().and_then(WorkCategory::parse_letter),
                })
                .collect(),
        };
        let totals = CategoryTotals::from_entries(&entries);
        Step2Data { entries, totals }
    }

    /// Complete once at least one entry carries a category.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().any(|e| e.category.is_some())
    }
}
