pub mod gemini;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{GenerationSettings, LLMConfig};
use async_trait::async_trait;
use serde_json::Value;

pub use gemini::GeminiClient;

/// A user turn in the conversation sent upstream.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One upstream completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub settings: GenerationSettings,
    pub json_output: bool,
}

/// Upstream completion service. Returns the raw response envelope untouched;
/// callers extract text from it with `infrastructure::response`.
#[async_trait]
pub trait LLMClient {
    async fn generate(&self, config: &LLMConfig, request: &CompletionRequest) -> Result<Value>;
}

/// The upstream credential, or a configuration error when it was never set.
pub fn require_credential(config: &LLMConfig) -> Result<&str> {
    config.credential().ok_or_else(|| {
        AppError::ConfigurationError("GEMINI_API_KEY is not configured".to_string())
    })
}
