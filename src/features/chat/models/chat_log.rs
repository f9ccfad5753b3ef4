use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// One recorded chat exchange
#[derive(Debug, Clone, FromRow)]
pub struct ChatLog {
    pub id: i64,
    pub owner_user_id: String,
    pub conversation_id: Option<String>,
    pub user_message: String,
    pub response_text: String,
    pub response_chart_json: Option<Value>,
    /// JSON array of the document ids that were in context
    pub document_ids: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChatLog {
    pub owner_user_id: String,
    pub conversation_id: Option<String>,
    pub user_message: String,
    pub response_text: String,
    pub response_chart_json: Option<Value>,
    pub document_ids: Vec<i64>,
}
