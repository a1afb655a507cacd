use async_trait::async_trait;
use gemba_core::{ChatMessage, Prompt};
use gemba_metrics::ResponseFormat;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

/// One completion choice as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub content: Option<String>,
    pub finish_reason: FinishReason,
}

impl Choice {
    pub fn stop(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: FinishReason::Stop,
        }
    }

    pub fn truncated(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: FinishReason::Length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: Prompt,
    pub model: String,
    /// Temperature step, 0..=10.
    pub temperature: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    /// Sampling temperature sent to the endpoint.
    pub fn sampling_temperature(&self) -> f64 {
        f64::from(self.temperature) / 10.0
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.prompt.messages()
    }

    /// Request body for an OpenAI-style chat completions endpoint.
    pub fn to_chat_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": self.messages(),
            "temperature": self.sampling_temperature(),
            "top_p": 1,
            "n": 1,
            "frequency_penalty": 0,
            "presence_penalty": 0,
        });
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = max_tokens.into();
        }
        if let Some(format) = self.response_format {
            body["response_format"] = format.request_parameter().clone();
        }
        body
    }
}

/// Chat-completion backend. Implementations own transport and
/// authentication; the request loop only sees choices and error kinds.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<Choice>, ProviderError>;
}
