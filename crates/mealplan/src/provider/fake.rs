//! Deterministic provider for tests and offline runs.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

use super::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, ProviderError,
    TextGenerator,
};

#[derive(Debug, Clone)]
enum Reply {
    Text {
        text: String,
        usage: Option<Value>,
    },
    Status {
        status: u16,
        message: String,
    },
    Transport(String),
}

/// Returns the same scripted reply to every call and records what it was sent.
#[derive(Debug)]
pub struct FakeGenerator {
    reply: Reply,
    calls: Mutex<Vec<GenerateContentRequest>>,
}

impl FakeGenerator {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `text` as the single part of the first candidate.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text {
            text: text.into(),
            usage: Some(json!({
                "promptTokenCount": 120,
                "candidatesTokenCount": 340,
                "totalTokenCount": 460
            })),
        })
    }

    /// Reply with `plan` serialized as JSON text.
    pub fn with_plan(plan: &Value) -> Self {
        Self::with_text(plan.to_string())
    }

    /// Fail as if the provider answered with a non-success status.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Status {
            status,
            message: message.into(),
        })
    }

    /// Fail as if the provider could not be reached.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Transport(message.into()))
    }

    /// Drop usage metadata from successful replies.
    pub fn without_usage(mut self) -> Self {
        if let Reply::Text { usage, .. } = &mut self.reply {
            *usage = None;
        }
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<GenerateContentRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate_content(
        &self,
        _api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        match &self.reply {
            Reply::Text { text, usage } => Ok(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content::text(text.clone())),
                }],
                usage_metadata: usage.clone(),
            }),
            Reply::Status { status, message } => Err(ProviderError::Status {
                status: *status,
                message: message.clone(),
            }),
            Reply::Transport(message) => Err(ProviderError::Transport(message.clone())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
