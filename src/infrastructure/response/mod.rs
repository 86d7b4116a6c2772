//! Turns an untrusted `generateContent` envelope into text, and that text into JSON.
//!
//! Nothing here fails: missing fields become empty strings and unparseable
//! completions become `None`, leaving fallbacks to the shaping step.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

static OPENING_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?\s*").unwrap());

static CLOSING_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```\s*$").unwrap());

// Greedy and not nesting-aware: first `{` to last `}`, or first `[` to last `]`,
// whichever opens earlier.
static JSON_BLOCK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}|\[[\s\S]*\]").unwrap());

const PREVIEW_LIMIT: usize = 200;

/// Concatenates the `text` of every part of the first candidate, trimmed.
pub fn extract_candidate_text(envelope: &Value) -> String {
    let parts = envelope
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array);

    let Some(parts) = parts else {
        return String::new();
    };

    parts
        .iter()
        .map(|part| part.get("text").and_then(Value::as_str).unwrap_or(""))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Why the first candidate stopped, or why the prompt was blocked.
/// Only used for diagnostics when the extracted text comes back empty.
pub fn completion_stop_reason(envelope: &Value) -> Option<String> {
    let block_reason = envelope
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str);
    if let Some(reason) = block_reason {
        return Some(format!("blocked: {}", reason));
    }

    envelope
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("finishReason"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Best-effort JSON recovery from a model completion.
///
/// Tries, in order: the text as-is (after removing a surrounding code fence),
/// then the first brace- or bracket-delimited block inside it.
pub fn parse_model_json(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }

    let candidate = strip_code_fence(text);

    let parsed = parse_strict(&candidate).or_else(|| parse_embedded_block(&candidate));
    if parsed.is_none() {
        warn!(
            preview = %preview_text(&candidate, PREVIEW_LIMIT),
            "Model output is not parseable as JSON"
        );
    }
    parsed
}

fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let without_opening = OPENING_FENCE_PATTERN.replace(trimmed, "");
    CLOSING_FENCE_PATTERN
        .replace(&without_opening, "")
        .trim()
        .to_string()
}

fn parse_strict(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok()
}

fn parse_embedded_block(text: &str) -> Option<Value> {
    let block = JSON_BLOCK_PATTERN.find(text)?;
    match serde_json::from_str::<Value>(block.as_str()) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(error = %err, "Embedded JSON block failed to parse");
            None
        }
    }
}

pub(crate) fn preview_text(value: &str, limit: usize) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let snippet: String = trimmed.chars().take(limit).collect();
    if trimmed.chars().count() > limit {
        format!("{}…", snippet)
    } else {
        snippet
    }
}
