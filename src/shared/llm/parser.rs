use serde_json::Value;
use thiserror::Error;

use super::LlmResponse;

/// Markdown fence marker some models wrap their JSON in
const FENCE: &str = "```";

/// Reasons a raw LLM reply could not be turned into a response value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Response JSON is not an object")]
    NotAnObject,

    #[error("Response JSON is missing the `{0}` key")]
    MissingField(&'static str),
}

/// Strip surrounding whitespace and a markdown code fence
///
/// When the text opens with a fence, its first line (the fence plus any
/// language tag) is dropped, and so is a final line consisting of just the
/// closing fence.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.split('\n').skip(1).collect();
    if lines.last().is_some_and(|line| line.trim() == FENCE) {
        lines.pop();
    }

    lines.join("\n")
}

/// Parse raw LLM output into the target type
///
/// Parsing pipeline:
/// 1. Strip the markdown fence, if any
/// 2. Decode a single JSON value
/// 3. Require a JSON object
/// 4. Let the target type validate its keys
pub fn try_parse<T>(text: &str) -> Result<T, ParseError>
where
    T: LlmResponse,
{
    let cleaned = strip_code_fence(text);

    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(object) => T::from_object(object),
        _ => Err(ParseError::NotAnObject),
    }
}

/// Parse LLM response text with graceful fallback
///
/// Malformed output is never surfaced as an error: the target type's
/// fallback is built from the raw text instead and a warning is logged.
pub fn parse_with_fallback<T>(text: &str) -> T
where
    T: LlmResponse,
{
    match try_parse::<T>(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(
                "LLM response parsing failed, using raw text fallback: {} (first 200 chars: {})",
                e,
                text.chars().take(200).collect::<String>()
            );
            T::fallback(text)
        }
    }
}
