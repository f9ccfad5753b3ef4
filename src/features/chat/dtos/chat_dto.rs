use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::features::chat::models::ChatLog;

/// Chat request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChatRequestDto {
    /// Question about the uploaded documents
    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    #[schema(example = "Berapa target NPS Q3?")]
    pub message: String,
    /// Groups exchanges so earlier turns are replayed as context
    #[validate(length(max = 100, message = "Conversation ID must not exceed 100 characters"))]
    #[serde(default)]
    #[schema(example = "c1")]
    pub conversation_id: Option<String>,
}

impl ChatRequestDto {
    /// Trim both fields; a blank conversation id means "no conversation"
    pub fn normalized(self) -> Self {
        let conversation_id = self
            .conversation_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Self {
            message: self.message.trim().to_string(),
            conversation_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatLogDto {
    pub id: i64,
    pub user_message: String,
    pub response_text: String,
    #[schema(value_type = Option<Object>)]
    pub response_chart_json: Option<Value>,
    /// Ids of the documents that were in context
    #[schema(value_type = Option<Vec<i64>>)]
    pub document_ids: Option<Value>,
    pub conversation_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ChatLog> for ChatLogDto {
    fn from(log: ChatLog) -> Self {
        Self {
            id: log.id,
            user_message: log.user_message,
            response_text: log.response_text,
            response_chart_json: log.response_chart_json,
            document_ids: log.document_ids,
            conversation_id: log.conversation_id,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryResponseDto {
    pub count: usize,
    pub history: Vec<ChatLogDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str, conversation_id: Option<&str>) -> ChatRequestDto {
        ChatRequestDto {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        }
    }

    #[test]
    fn test_normalized_trims_fields() {
        let dto = request("  berapa target?  ", Some(" c1 ")).normalized();
        assert_eq!(dto.message, "berapa target?");
        assert_eq!(dto.conversation_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_blank_conversation_id_becomes_none() {
        assert_eq!(request("halo", Some("   ")).normalized().conversation_id, None);
        assert_eq!(request("halo", None).normalized().conversation_id, None);
    }

    #[test]
    fn test_whitespace_only_message_is_rejected_after_normalizing() {
        assert!(request("   ", None).normalized().validate().is_err());
    }

    #[test]
    fn test_length_limits() {
        assert!(request(&"a".repeat(5000), None).validate().is_ok());
        assert!(request(&"a".repeat(5001), None).validate().is_err());
        assert!(request("halo", Some(&"c".repeat(101))).validate().is_err());
        assert!(request("halo", Some(&"c".repeat(100))).validate().is_ok());
    }

    #[test]
    fn test_deserializes_without_conversation_id() {
        let dto: ChatRequestDto = serde_json::from_str(r#"{"message": "halo"}"#).unwrap();
        assert_eq!(dto.conversation_id, None);
    }
}
