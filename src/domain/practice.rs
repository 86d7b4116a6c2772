use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

pub const DEFAULT_PHRASE_COUNT: usize = 100;
pub const MAX_PHRASES: usize = 200;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    /// The learner's translation attempt.
    #[validate(required, length(min = 1))]
    pub prompt: Option<String>,
    #[validate(required, length(min = 1))]
    pub original_phrase: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhrasesRequest {
    pub count: Option<Value>,
    pub level: Option<Value>,
}

impl PhrasesRequest {
    /// Requested batch size, clamped to `1..=MAX_PHRASES`.
    ///
    /// Numbers are truncated, numeric strings are parsed, anything else
    /// falls back to [`DEFAULT_PHRASE_COUNT`].
    pub fn count(&self) -> usize {
        let requested = match &self.count {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite());

        match requested {
            Some(n) => n.trunc().clamp(1.0, MAX_PHRASES as f64) as usize,
            None => DEFAULT_PHRASE_COUNT,
        }
    }

    pub fn level(&self) -> Level {
        self.level
            .as_ref()
            .and_then(Value::as_str)
            .map(Level::parse)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// Case-insensitive; unknown values are treated as `Easy`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "medium" => Level::Medium,
            "hard" => Level::Hard,
            _ => Level::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Level::Easy => "short, simple everyday sentences (4-8 words) using common vocabulary and present tense",
            Level::Medium => "sentences of 8-14 words mixing past and future tenses, common idioms and compound clauses",
            Level::Hard => "longer sentences (12-20 words) with subordinate clauses, conditionals, nuanced vocabulary and idiomatic expressions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub score: Option<i64>,
    pub feedback: String,
    pub correct_translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseBatch {
    pub phrases: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub result: EvaluationResult,
    pub raw: Value,
}

#[derive(Debug, Serialize)]
pub struct PhrasesResponse {
    #[serde(flatten)]
    pub batch: PhraseBatch,
    pub raw: Value,
}
