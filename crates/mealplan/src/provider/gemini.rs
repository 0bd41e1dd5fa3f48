//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GenerateContentRequest, GenerateContentResponse, ProviderError, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Provider's own message when the body carries one, otherwise a generic one.
    fn error_message(status: u16, body: &str) -> String {
        serde_json::from_str::<GeminiErrorBody>(body)
            .map(|b| b.error.message)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Provider request failed with status {status}"))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(err = %e, "provider request failed");
                ProviderError::Transport(format!("Could not reach the provider: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("Could not read provider response: {e}")))?;

        if !status.is_success() {
            let message = Self::error_message(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), message = %message, "provider returned an error");

            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "provider responded");

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
