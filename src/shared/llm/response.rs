use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::ParseError;

/// Trait for structured values decoded from raw LLM output
///
/// The parser takes care of fence stripping and JSON decoding; implementors
/// validate the decoded object and say what to return when decoding fails.
pub trait LlmResponse: JsonSchema + Sized {
    /// Build the response from the decoded top-level JSON object
    fn from_object(object: Map<String, Value>) -> Result<Self, ParseError>;

    /// Best-effort value used when the raw output cannot be parsed
    fn fallback(raw: &str) -> Self;

    /// Generate JSON schema string for use in LLM prompts
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}

/// The `{text, chart}` envelope returned to chat clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ChatEnvelope {
    /// Answer text
    pub text: String,
    /// Chart.js configuration (`type`, `data`, `options`), null when no chart
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub chart: Option<Value>,
}

impl ChatEnvelope {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chart: None,
        }
    }
}

impl LlmResponse for ChatEnvelope {
    fn from_object(mut object: Map<String, Value>) -> Result<Self, ParseError> {
        let text = match object.remove("text") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => return Err(ParseError::MissingField("text")),
        };

        // A missing key and an explicit null both mean "no chart"
        let chart = match object.remove("chart") {
            None | Some(Value::Null) => None,
            Some(chart) => Some(chart),
        };

        Ok(Self { text, chart })
    }

    fn fallback(raw: &str) -> Self {
        Self::text_only(raw)
    }
}
