use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// Database model for documents
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: i64,
    pub owner_user_id: String,
    pub title: String,
    pub content: String,
    pub source_filename: String,
    pub mime_type: String,
    pub content_length: i32,
    pub structured_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when storing a freshly extracted document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner_user_id: String,
    pub title: String,
    pub content: String,
    pub source_filename: String,
    pub mime_type: String,
    /// Size of the uploaded file in bytes
    pub content_length: i32,
    pub structured_data: Option<Value>,
}

