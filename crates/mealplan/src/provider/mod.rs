//! Generative text provider abstraction.
//!
//! The wire types follow the Gemini `generateContent` shape. Implementations
//! must be stateless and thread-safe; one call is made per generation and
//! nothing is retried.

mod fake;
mod gemini;

pub use fake::FakeGenerator;
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const MAX_OUTPUT_TOKENS: u32 = 700;
pub const TEMPERATURE: f32 = 0.4;
pub const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Unreadable provider response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            response_mime_type: JSON_MIME_TYPE.to_owned(),
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn new(system: &str, prompt: &str) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            system_instruction: Content::text(system),
            generation_config: GenerationConfig::default(),
        }
    }

    /// Text of the user prompt, as sent.
    pub fn prompt_text(&self) -> String {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<Value>,
}

impl GenerateContentResponse {
    /// Concatenate every text part of the first candidate.
    pub fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest::new("be brief", "plan my day");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{ "parts": [{ "text": "plan my day" }] }],
                "systemInstruction": { "parts": [{ "text": "be brief" }] },
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "maxOutputTokens": 700,
                    "temperature": 0.4f32
                }
            })
        );
    }

    #[test]
    fn test_first_candidate_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, {}, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ],
            "usageMetadata": { "totalTokenCount": 12 }
        }))
        .unwrap();

        assert_eq!(response.first_candidate_text(), "{\"a\":1}");
        assert_eq!(response.usage_metadata, Some(json!({ "totalTokenCount": 12 })));
    }

    #[test]
    fn test_missing_candidates_yield_empty_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.first_candidate_text(), "");

        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
                .unwrap();
        assert_eq!(response.first_candidate_text(), "");
    }
}
