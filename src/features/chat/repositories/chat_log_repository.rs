use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::Result;
use crate::features::chat::models::{ChatLog, NewChatLog};

/// Append-only record of chat exchanges
#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    async fn create(&self, log: NewChatLog) -> Result<ChatLog>;

    /// Latest `limit` exchanges of one conversation, newest first
    async fn recent_in_conversation(
        &self,
        owner_user_id: &str,
        conversation_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatLog>>;

    /// Latest `limit` exchanges of a user across all conversations, newest first
    async fn history(&self, owner_user_id: &str, limit: i64) -> Result<Vec<ChatLog>>;
}

pub struct PgChatLogRepository {
    pool: PgPool,
}

impl PgChatLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatLogRepository for PgChatLogRepository {
    async fn create(&self, log: NewChatLog) -> Result<ChatLog> {
        let created = sqlx::query_as::<_, ChatLog>(
            r#"
            INSERT INTO chat_logs (owner_user_id, conversation_id, user_message, response_text, response_chart_json, document_ids)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&log.owner_user_id)
        .bind(&log.conversation_id)
        .bind(&log.user_message)
        .bind(&log.response_text)
        .bind(&log.response_chart_json)
        .bind(serde_json::json!(log.document_ids))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn recent_in_conversation(
        &self,
        owner_user_id: &str,
        conversation_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatLog>> {
        let logs = sqlx::query_as::<_, ChatLog>(
            r#"
            SELECT * FROM chat_logs
            WHERE owner_user_id = $1 AND conversation_id = $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(owner_user_id)
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    async fn history(&self, owner_user_id: &str, limit: i64) -> Result<Vec<ChatLog>> {
        let logs = sqlx::query_as::<_, ChatLog>(
            r#"
            SELECT * FROM chat_logs
            WHERE owner_user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(owner_user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
