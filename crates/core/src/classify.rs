//! The activity-classification capability.
//!
//! Classification is advisory: the participant reviews and can correct
//! every assignment in step 2. The adapter therefore never fails a
//! request -- any error from the underlying service degrades to the
//! default category for every item.

use async_trait::async_trait;

use crate::steps::classification::WorkCategory;
use crate::steps::time_inventory::Activity;

/// Category assigned when the classifier fails or returns junk.
pub const DEFAULT_CATEGORY: WorkCategory = WorkCategory::Other;

/// An activity with its assigned work type.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassifiedActivity {
    pub description: String,
    pub hours: f64,
    pub work_type: WorkCategory,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("classification request failed: {0}")]
    Request(String),
    #[error("classifier returned a malformed response")]
    MalformedResponse,
}

/// A text-classification capability over the 5-category taxonomy.
///
/// Injected into application state so tests can substitute a
/// deterministic or failing implementation without a network dependency.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify each activity, returning one category per input item in
    /// input order.
    async fn classify(&self, activities: &[Activity]) -> Result<Vec<WorkCategory>, ClassifyError>;
}

/// Run the classifier and apply the best-effort fallback.
///
/// Always returns exactly one [`ClassifiedActivity`] per input activity.
/// On any error, or for any item the classifier did not cover, the
/// [`DEFAULT_CATEGORY`] is substituted.
pub async fn classify_with_fallback(
    classifier: &dyn Classifier,
    activities: &[Activity],
) -> Vec<ClassifiedActivity> {
    let categories = match classifier.classify(activities).await {
        Ok(categories) => categories,
        Err(err) => {
            tracing::warn!(error = %err, "classification failed, assigning default category");
            Vec::new()
        }
    };

    activities
        .iter()
        .enumerate()
        .map(|(i, a)| ClassifiedActivity {
            description: a.description.clone(),
            hours: a.hours,
            work_type: categories.get(i).copied().unwrap_or(DEFAULT_CATEGORY),
        })
        .collect()
}

/// Extract the categories from a raw model response.
///
/// The response is expected to contain a JSON array of objects with a
/// `work_type` field somewhere in the text. Returns `None` when no such
/// array can be parsed; individual invalid categories become `None`
/// entries resolved to the default by the caller.
pub fn parse_response(text: &str, expected_len: usize) -> Option<Vec<WorkCategory>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }

    #[derive(serde::Deserialize)]
    struct RawItem {
        #[serde(default)]
        work_type: String,
    }

    let items: Vec<RawItem> = serde_json::from_str(&text[start..=end]).ok()?;
    let mut categories: Vec<WorkCategory> = items
        .iter()
        .map(|item| WorkCategory::parse_letter(&item.work_type).unwrap_or(DEFAULT_CATEGORY))
        .collect();
    categories.resize(expected_len, DEFAULT_CATEGORY);
    Some(categories)
}

/// Build the classification prompt embedding the activity list.
pub fn build_prompt(activities: &[Activity]) -> String {
    let list = activities
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {} ({} hours)", i + 1, a.description, a.hours))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You classify activities according to Charles Handy's portfolio-work theory.\n\
         \n\
         Assign each activity exactly one of the five categories:\n\
         - A: Paid Work - jobs, side businesses, anything generating income\n\
         - B: Home Work - housework, childcare, caregiving, supporting family\n\
         - C: Gift Work - volunteering, community activity, unpaid contribution\n\
         - D: Study Work - learning, qualifications, skill-building, self-development\n\
         - E: Other - commuting, social media, leisure, rest, sleep, anything else\n\
         \n\
         Classify the following activity list and return ONLY a JSON array, no prose.\n\
         \n\
         Activities:\n{list}\n\
         \n\
         Response format (JSON only):\n\
         [{{\"description\":\"activity\",\"hours\":0,\"work_type\":\"A\"}},...]"
    )
}
