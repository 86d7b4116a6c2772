use serde::{Deserialize, Serialize};

/// Sampling parameters sent as `generationConfig` with each upstream call.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub evaluation: GenerationSettings,
    pub phrases: GenerationSettings,
}

impl LLMConfig {
    /// The credential, ignoring blank values picked up from an empty env var.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            request_timeout_secs: 30,
            evaluation: GenerationSettings {
                temperature: 0.2,
                top_k: 32,
                top_p: 0.9,
                max_output_tokens: 512,
            },
            phrases: GenerationSettings {
                temperature: 0.9,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 8192,
            },
        }
    }
}
