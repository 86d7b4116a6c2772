use super::{require_credential, CompletionRequest, LLMClient};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

impl GeminiRequest {
    fn from_completion(request: &CompletionRequest) -> Self {
        let contents = request
            .messages
            .iter()
            .map(|message| GeminiContent {
                parts: vec![GeminiPart {
                    text: message.text.clone(),
                }],
                role: Some("user".to_string()),
            })
            .collect();

        let system_instruction = request
            .system
            .as_ref()
            .filter(|system| !system.trim().is_empty())
            .map(|system| GeminiContent {
                parts: vec![GeminiPart {
                    text: system.clone(),
                }],
                role: None,
            });

        let settings = &request.settings;
        Self {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                top_k: settings.top_k,
                top_p: settings.top_p,
                max_output_tokens: settings.max_output_tokens,
                response_mime_type: request
                    .json_output
                    .then(|| "application/json".to_string()),
            },
        }
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn normalize_model(model: &str) -> String {
        let trimmed = model.trim();

        trimmed
            .strip_prefix("models/")
            .unwrap_or(trimmed)
            .to_string()
    }

    fn endpoint(config: &LLMConfig, api_key: &str) -> Result<Url> {
        let base_url = config.base_url.trim_end_matches('/');
        let model_id = Self::normalize_model(&config.model);
        let mut url = Url::parse(&format!("{}/models/{}:generateContent", base_url, model_id))
            .map_err(|e| {
                AppError::ConfigurationError(format!("Invalid Gemini base_url: {}", e))
            })?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }

    async fn send(&self, url: Url, body: &GeminiRequest) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini request failed");
                AppError::upstream(None, format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Gemini returned an error status");
            let details =
                serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text));
            return Err(AppError::upstream(Some(status.as_u16()), details));
        }

        response.json::<Value>().await.map_err(|e| {
            error!(error = %e, "Gemini response body is not JSON");
            AppError::upstream(
                Some(status.as_u16()),
                format!("Failed to parse JSON: {}", e),
            )
        })
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, config: &LLMConfig, request: &CompletionRequest) -> Result<Value> {
        let api_key = require_credential(config)?;
        let url = Self::endpoint(config, api_key)?;
        let body = GeminiRequest::from_completion(request);

        debug!(
            model = %config.model,
            messages = request.messages.len(),
            "Calling Gemini generateContent"
        );

        // Dropping this future (client disconnect) aborts the in-flight request.
        let deadline = Duration::from_secs(config.request_timeout_secs);
        match tokio::time::timeout(deadline, self.send(url, &body)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    timeout_secs = config.request_timeout_secs,
                    "Gemini request exceeded deadline"
                );
                Err(AppError::UpstreamTimeout(config.request_timeout_secs))
            }
        }
    }
}
