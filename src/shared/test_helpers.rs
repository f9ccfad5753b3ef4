//! In-memory stand-ins for the stores, the LLM gateway and authentication

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::chat::models::{ChatLog, NewChatLog};
use crate::features::chat::repositories::ChatLogRepository;
use crate::features::documents::models::{Document, NewDocument};
use crate::features::documents::repositories::DocumentRepository;
use crate::modules::llm::{ChatMessage, CompletionClient, GatewayError};

pub const TEST_USER_ID: &str = "test-user-id";

pub fn create_test_user() -> AuthenticatedUser {
    AuthenticatedUser::new(TEST_USER_ID)
}

async fn inject_test_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_test_user());
    next.run(request).await
}

/// Serve `router` as if every request carried a valid token for [`TEST_USER_ID`]
pub fn with_test_user(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_test_user_middleware))
}

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    documents: Mutex<Vec<Document>>,
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, document: NewDocument) -> Result<Document> {
        let mut documents = self.documents.lock().unwrap();
        let now = Utc::now();
        let created = Document {
            id: documents.iter().map(|d| d.id).max().unwrap_or(0) + 1,
            content_length: document.content_length,
            owner_user_id: document.owner_user_id,
            title: document.title,
            content: document.content,
            source_filename: document.source_filename,
            mime_type: document.mime_type,
            structured_data: document.structured_data,
            created_at: now,
            updated_at: now,
        };
        documents.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let mut documents = self.documents.lock().unwrap().clone();
        documents.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(documents)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < before)
    }
}

/// Chat-log store; the `failing` variant errors on every call
#[derive(Default)]
pub struct InMemoryChatLogRepository {
    logs: Mutex<Vec<ChatLog>>,
    fail: bool,
}

impl InMemoryChatLogRepository {
    pub fn failing() -> Self {
        Self {
            logs: Mutex::default(),
            fail: true,
        }
    }

    /// Stored logs in insertion order
    pub fn logs(&self) -> Vec<ChatLog> {
        self.logs.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(AppError::Internal("chat log store unavailable".to_string()));
        }
        Ok(())
    }

    fn newest_first(&self, keep: impl Fn(&ChatLog) -> bool, limit: i64) -> Vec<ChatLog> {
        let mut logs: Vec<ChatLog> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|log| keep(log))
            .cloned()
            .collect();
        logs.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        logs.truncate(limit as usize);
        logs
    }
}

#[async_trait]
impl ChatLogRepository for InMemoryChatLogRepository {
    async fn create(&self, log: NewChatLog) -> Result<ChatLog> {
        self.check()?;
        let mut logs = self.logs.lock().unwrap();
        let created = ChatLog {
            id: logs.len() as i64 + 1,
            owner_user_id: log.owner_user_id,
            conversation_id: log.conversation_id,
            user_message: log.user_message,
            response_text: log.response_text,
            response_chart_json: log.response_chart_json,
            document_ids: Some(serde_json::json!(log.document_ids)),
            created_at: Utc::now(),
        };
        logs.push(created.clone());
        Ok(created)
    }

    async fn recent_in_conversation(
        &self,
        owner_user_id: &str,
        conversation_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatLog>> {
        self.check()?;
        Ok(self.newest_first(
            |log| {
                log.owner_user_id == owner_user_id
                    && log.conversation_id.as_deref() == Some(conversation_id)
            },
            limit,
        ))
    }

    async fn history(&self, owner_user_id: &str, limit: i64) -> Result<Vec<ChatLog>> {
        self.check()?;
        Ok(self.newest_first(|log| log.owner_user_id == owner_user_id, limit))
    }
}

/// Completion client that replays scripted replies and records every request
pub struct MockCompletionClient {
    replies: Mutex<VecDeque<std::result::Result<String, GatewayError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletionClient {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::default(),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            requests: Mutex::default(),
        }
    }

    /// Message sequences received so far, one entry per call
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, GatewayError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyContent))
    }
}
