use crate::application::use_cases::prompts::{
    build_evaluation_system_prompt, build_evaluation_user_prompt,
};
use crate::application::use_cases::shaping::shape_evaluation;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::practice::EvaluateResponse;
use crate::infrastructure::llm_clients::{
    require_credential, ChatMessage, CompletionRequest, LLMClient,
};
use crate::infrastructure::response::{
    completion_stop_reason, extract_candidate_text, parse_model_json,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct EvaluateUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl EvaluateUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(
        &self,
        config: &LLMConfig,
        original_phrase: &str,
        attempt: &str,
    ) -> Result<EvaluateResponse> {
        require_credential(config)?;

        let request = CompletionRequest {
            system: Some(build_evaluation_system_prompt()),
            messages: vec![ChatMessage::user(build_evaluation_user_prompt(
                original_phrase,
                attempt,
            ))],
            settings: config.evaluation.clone(),
            json_output: true,
        };

        let raw = self.llm_client.generate(config, &request).await?;

        let text = extract_candidate_text(&raw);
        if text.is_empty() {
            warn!(
                stop_reason = completion_stop_reason(&raw).as_deref().unwrap_or("unknown"),
                "Evaluation completion contained no text"
            );
        }

        let parsed = parse_model_json(&text);
        let result = shape_evaluation(parsed.as_ref(), &text);

        info!(
            score = ?result.score,
            structured = parsed.is_some(),
            "Translation evaluated"
        );

        Ok(EvaluateResponse { result, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::shaping::{
        NO_RESPONSE_PLACEHOLDER, NO_TRANSLATION_PLACEHOLDER,
    };
    use crate::application::use_cases::test_support::{configured, StubClient};
    use crate::domain::error::AppError;
    use serde_json::json;

    #[tokio::test]
    async fn test_execute_shapes_fenced_output() {
        let client = StubClient::with_text(
            "```json\n{\"score\": 13.7, \"feedback\": \"Too literal.\", \"correctTranslation\": \"Buenos días\"}\n```",
        );
        let use_case = EvaluateUseCase::new(client.clone());

        let response = use_case
            .execute(&configured(), "Good morning", "Bueno mañana")
            .await
            .unwrap();

        assert_eq!(response.result.score, Some(10));
        assert_eq!(response.result.feedback, "Too literal.");
        assert_eq!(response.result.correct_translation, "Buenos días");
        assert_eq!(response.raw, client.envelope());

        let request = client.last_request().expect("request recorded");
        assert!(request.json_output);
        assert_eq!(request.settings, LLMConfig::default().evaluation);
        assert!(request.messages[0].text.contains("Original phrase: Good morning"));
        assert!(request.messages[0].text.contains("Learner translation: Bueno mañana"));
    }

    #[tokio::test]
    async fn test_execute_uses_raw_text_when_unstructured() {
        let client = StubClient::with_text("Pretty good, but mind the article.");
        let response = EvaluateUseCase::new(client)
            .execute(&configured(), "The house", "Casa")
            .await
            .unwrap();

        assert_eq!(response.result.score, None);
        assert_eq!(response.result.feedback, "Pretty good, but mind the article.");
        assert_eq!(response.result.correct_translation, NO_TRANSLATION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_execute_with_empty_envelope() {
        let client = StubClient::with_envelope(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let response = EvaluateUseCase::new(client)
            .execute(&configured(), "Hi", "Hola")
            .await
            .unwrap();

        assert_eq!(response.result.score, None);
        assert_eq!(response.result.feedback, NO_RESPONSE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_execute_requires_credential() {
        let client = StubClient::with_text("{}");
        let err = EvaluateUseCase::new(client.clone())
            .execute(&LLMConfig::default(), "Hi", "Hola")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationError(_)));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_propagates_upstream_error() {
        let client = StubClient::failing(AppError::upstream(Some(429), json!({"error": "quota"})));
        let err = EvaluateUseCase::new(client)
            .execute(&configured(), "Hi", "Hola")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamError { status: Some(429), .. }));
    }
}
