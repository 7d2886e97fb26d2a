//! HTTP adapter for the activity classifier.
//!
//! Talks to an Anthropic-style messages API. Errors never propagate to
//! participants: `classify_with_fallback` in `atelier_core` substitutes
//! the default category whenever this adapter fails, so a missing API
//! key or a network outage degrades the feature instead of breaking the
//! step-2 flow.

use async_trait::async_trait;
use atelier_core::classify::{build_prompt, parse_response, Classifier, ClassifyError};
use atelier_core::steps::classification::WorkCategory;
use atelier_core::steps::time_inventory::Activity;
use serde_json::json;

use crate::config::ClassifierConfig;

/// Maximum tokens requested per classification call.
const MAX_TOKENS: u32 = 1024;

/// Classifier backed by an external messages API.
pub struct HttpClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, activities: &[Activity]) -> Result<Vec<WorkCategory>, ClassifyError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ClassifyError::Request("no API key configured".into()))?;

        let body = json!({
            "model": self.config.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": build_prompt(activities) }],
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Request(format!(
                "classifier service returned {status}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        let text = payload["content"][0]["text"]
            .as_str()
            .ok_or(ClassifyError::MalformedResponse)?;

        parse_response(text, activities.len()).ok_or(ClassifyError::MalformedResponse)
    }
}
