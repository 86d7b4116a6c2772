use crate::application::use_cases::prompts::{
    build_phrases_system_prompt, build_phrases_user_prompt,
};
use crate::application::use_cases::shaping::shape_phrases;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::practice::{Level, PhraseBatch, PhrasesResponse};
use crate::infrastructure::llm_clients::{
    require_credential, ChatMessage, CompletionRequest, LLMClient,
};
use crate::infrastructure::response::{
    completion_stop_reason, extract_candidate_text, parse_model_json, preview_text,
};
use std::sync::Arc;
use tracing::{error, info};

pub struct PhrasesUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl PhrasesUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(
        &self,
        config: &LLMConfig,
        language: &str,
        count: usize,
        level: Level,
    ) -> Result<PhrasesResponse> {
        require_credential(config)?;

        let request = CompletionRequest {
            system: Some(build_phrases_system_prompt(language)),
            messages: vec![ChatMessage::user(build_phrases_user_prompt(
                count, level, language,
            ))],
            settings: config.phrases.clone(),
            json_output: true,
        };

        let raw = self.llm_client.generate(config, &request).await?;

        let text = extract_candidate_text(&raw);
        let parsed = parse_model_json(&text);
        let phrases = shape_phrases(parsed.as_ref(), &text, count);

        if phrases.is_empty() {
            error!(
                stop_reason = completion_stop_reason(&raw).as_deref().unwrap_or("unknown"),
                preview = %preview_text(&text, 200),
                "No usable phrases in completion"
            );
            return Err(AppError::ShapingFailure(
                "The model did not return any usable phrases".to_string(),
            ));
        }

        info!(
            requested = count,
            returned = phrases.len(),
            level = level.as_str(),
            "Practice phrases generated"
        );

        Ok(PhrasesResponse {
            batch: PhraseBatch { phrases },
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{configured, StubClient};
    use serde_json::json;

    #[tokio::test]
    async fn test_execute_truncates_to_requested_count() {
        let phrases: Vec<String> = (1..=12).map(|i| format!("Sentence {}.", i)).collect();
        let text = json!({ "phrases": phrases.clone() }).to_string();
        let client = StubClient::with_text(&text);

        let response = PhrasesUseCase::new(client.clone())
            .execute(&configured(), "English", 5, Level::Medium)
            .await
            .unwrap();

        assert_eq!(response.batch.phrases, phrases[..5].to_vec());
        assert_eq!(response.raw, client.envelope());

        let request = client.last_request().expect("request recorded");
        assert_eq!(request.settings, LLMConfig::default().phrases);
        assert!(request.messages[0].text.contains("Difficulty: medium"));
    }

    #[tokio::test]
    async fn test_execute_falls_back_to_lines() {
        let client = StubClient::with_text("Here you go:\n1. I am hungry.\n2. Where is the station?");
        let response = PhrasesUseCase::new(client)
            .execute(&configured(), "English", 100, Level::Easy)
            .await
            .unwrap();

        assert_eq!(
            response.batch.phrases,
            vec![
                "Here you go:".to_string(),
                "I am hungry.".to_string(),
                "Where is the station?".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_execute_fails_without_phrases() {
        let client = StubClient::with_envelope(json!({"candidates": []}));
        let err = PhrasesUseCase::new(client)
            .execute(&configured(), "English", 10, Level::Easy)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ShapingFailure(_)));
    }

    #[tokio::test]
    async fn test_execute_requires_credential() {
        let client = StubClient::with_text("[\"Hello\"]");
        let err = PhrasesUseCase::new(client.clone())
            .execute(&LLMConfig::default(), "English", 10, Level::Easy)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationError(_)));
        assert_eq!(client.request_count(), 0);
    }
}
