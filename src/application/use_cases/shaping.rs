//! Converts loosely-typed model output into the response contracts.

use crate::domain::practice::{EvaluationResult, MAX_PHRASES};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

pub const NO_RESPONSE_PLACEHOLDER: &str = "No response received from the model.";
pub const NO_TRANSLATION_PLACEHOLDER: &str = "Translation not provided.";

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 10.0;

// Leading bullets and numbering such as `- `, `* ` or `12. `.
static LIST_MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*\d.\s]+").unwrap());
// A bare code fence line, optionally tagged (```json).
static FENCE_LINE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```[\w-]*\s*$").unwrap());

pub fn shape_evaluation(parsed: Option<&Value>, raw_text: &str) -> EvaluationResult {
    let score = coerce_score(parsed.and_then(|value| value.get("score")));

    let feedback = non_empty_str(parsed, "feedback")
        .or_else(|| Some(raw_text.trim()).filter(|text| !text.is_empty()))
        .unwrap_or(NO_RESPONSE_PLACEHOLDER)
        .to_string();

    let correct_translation = non_empty_str(parsed, "correctTranslation")
        .unwrap_or(NO_TRANSLATION_PLACEHOLDER)
        .to_string();

    EvaluationResult {
        score,
        feedback,
        correct_translation,
    }
}

fn non_empty_str<'a>(parsed: Option<&'a Value>, key: &str) -> Option<&'a str> {
    parsed
        .and_then(|value| value.get(key))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Finite numbers (or numeric strings) clamped to 0..=10 and rounded.
fn coerce_score(value: Option<&Value>) -> Option<i64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    if !number.is_finite() {
        return None;
    }
    Some(number.clamp(MIN_SCORE, MAX_SCORE).round() as i64)
}

/// Deduplicated phrases, at most `requested` (and never more than [`MAX_PHRASES`]).
///
/// Reads a bare array or an object's `phrases` array. Only when that yields
/// nothing does it fall back to the raw text, one phrase per line.
pub fn shape_phrases(parsed: Option<&Value>, raw_text: &str, requested: usize) -> Vec<String> {
    let items: &[Value] = match parsed {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => map
            .get("phrases")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    let mut phrases = collect_unique(items.iter().filter_map(Value::as_str));

    if phrases.is_empty() && !raw_text.trim().is_empty() {
        phrases = collect_unique(
            raw_text
                .lines()
                .filter(|line| !FENCE_LINE_PATTERN.is_match(line))
                .map(|line| LIST_MARKER_PATTERN.replace(line, "").into_owned()),
        );
    }

    phrases.truncate(requested);
    phrases
}

fn collect_unique<S: AsRef<str>>(candidates: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phrases = Vec::new();

    for candidate in candidates {
        let phrase = candidate.as_ref().trim();
        if phrase.is_empty() {
            continue;
        }
        if seen.insert(phrase.to_lowercase()) {
            phrases.push(phrase.to_string());
            if phrases.len() >= MAX_PHRASES {
                break;
            }
        }
    }

    phrases
}
