use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::{CompletionRequest, LLMClient};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub(crate) fn configured() -> LLMConfig {
    LLMConfig {
        api_key: Some("test-key".to_string()),
        ..LLMConfig::default()
    }
}

/// Canned upstream that records every request it receives.
pub(crate) struct StubClient {
    envelope: Value,
    failure: Mutex<Option<AppError>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubClient {
    pub(crate) fn with_envelope(envelope: Value) -> Arc<Self> {
        Arc::new(Self {
            envelope,
            failure: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn with_text(text: &str) -> Arc<Self> {
        Self::with_envelope(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        }))
    }

    pub(crate) fn failing(error: AppError) -> Arc<Self> {
        let client = Self::with_envelope(Value::Null);
        *client.failure.lock().unwrap() = Some(error);
        client
    }

    pub(crate) fn envelope(&self) -> Value {
        self.envelope.clone()
    }

    pub(crate) fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMClient for StubClient {
    async fn generate(&self, _config: &LLMConfig, request: &CompletionRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.envelope.clone())
    }
}
