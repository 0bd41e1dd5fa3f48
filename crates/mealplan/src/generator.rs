use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::plan::normalize_plan;
use crate::preferences::Preferences;
use crate::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::provider::{GenerateContentRequest, ProviderError, TextGenerator};
use crate::repair::repair_json;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Invalid JSON from provider")]
    InvalidJson,
}

/// A generated plan together with the provider's usage metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPlan {
    pub plan: Value,
    pub usage: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct Generator {
    provider: Arc<dyn TextGenerator>,
}

impl Generator {
    pub fn new(provider: Arc<dyn TextGenerator>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub fn request_for(prefs: &Preferences) -> GenerateContentRequest {
        GenerateContentRequest::new(SYSTEM_PROMPT, &build_prompt(prefs))
    }

    /// Run one generation: prompt, single provider call, repair, normalize.
    ///
    /// Normalization problems are logged and the plan is returned as received.
    #[tracing::instrument(skip_all, fields(provider = self.provider_name(), meals = prefs.num_meals))]
    pub async fn generate(
        &self,
        api_key: &str,
        prefs: &Preferences,
    ) -> Result<GeneratedPlan, GenerateError> {
        let request = Self::request_for(prefs);
        let response = self.provider.generate_content(api_key, &request).await?;

        let text = response.first_candidate_text();
        let text = text.trim();
        if text.is_empty() {
            tracing::warn!("provider returned no text");
            return Err(GenerateError::EmptyResponse);
        }

        let Some(mut plan) = repair_json(text) else {
            tracing::warn!(bytes = text.len(), "provider text is not JSON");
            return Err(GenerateError::InvalidJson);
        };

        if let Err(err) = normalize_plan(&mut plan, prefs.meal_count()) {
            tracing::warn!(err = %err, "plan left unnormalized");
        }

        Ok(GeneratedPlan {
            plan,
            usage: response.usage_metadata,
        })
    }
}
