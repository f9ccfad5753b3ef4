use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::chat::dtos::{ChatHistoryResponseDto, ChatLogDto, ChatRequestDto};
use crate::features::chat::models::{ChatLog, NewChatLog};
use crate::features::chat::repositories::ChatLogRepository;
use crate::features::chat::services::chart_intent::detect_chart_needed;
use crate::features::chat::services::context_builder::build_documents_context;
use crate::features::chat::services::prompt_builder::{build_messages, PromptInput};
use crate::features::documents::repositories::DocumentRepository;
use crate::modules::llm::{ChatMessage, CompletionClient};
use crate::shared::constants::{CONVERSATION_WINDOW, HISTORY_LIMIT};
use crate::shared::llm::{parse_with_fallback, ChatEnvelope};

/// Answers questions over the document pool and records every exchange
pub struct ChatService {
    documents: Arc<dyn DocumentRepository>,
    chat_logs: Arc<dyn ChatLogRepository>,
    llm: Arc<dyn CompletionClient>,
    context_max_length: usize,
}

impl ChatService {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        chat_logs: Arc<dyn ChatLogRepository>,
        llm: Arc<dyn CompletionClient>,
        context_max_length: usize,
    ) -> Self {
        Self {
            documents,
            chat_logs,
            llm,
            context_max_length,
        }
    }

    /// Answer one question with every stored document as context
    ///
    /// Gateway failures surface as [`AppError::ExternalServiceError`]. A reply
    /// that is not a valid envelope is returned as plain text instead.
    pub async fn chat(&self, owner_user_id: &str, request: ChatRequestDto) -> Result<ChatEnvelope> {
        let request = request.normalized();
        request.validate()?;

        let include_chart = detect_chart_needed(&request.message);
        let history = match request.conversation_id.as_deref() {
            Some(conversation_id) => {
                self.conversation_turns(owner_user_id, conversation_id)
                    .await
            }
            None => Vec::new(),
        };

        let documents = self.documents.list().await?;
        let document_ids: Vec<i64> = documents.iter().map(|doc| doc.id).collect();
        let documents_context = build_documents_context(&documents, self.context_max_length);

        let messages = build_messages(
            &PromptInput {
                message: &request.message,
                documents_context: &documents_context,
                include_chart,
                document_ids: &document_ids,
            },
            &history,
        )
        .map_err(|e| AppError::Internal(format!("Failed to render chat prompt: {}", e)))?;

        debug!(
            "Chat request: owner={}, documents={}, prior_turns={}, include_chart={}",
            owner_user_id,
            document_ids.len(),
            history.len(),
            include_chart
        );

        let raw = self
            .llm
            .complete(&messages)
            .await
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;

        let envelope: ChatEnvelope = parse_with_fallback(&raw);

        self.record(NewChatLog {
            owner_user_id: owner_user_id.to_string(),
            conversation_id: request.conversation_id,
            user_message: request.message,
            response_text: envelope.text.clone(),
            response_chart_json: envelope.chart.clone(),
            document_ids,
        })
        .await;

        Ok(envelope)
    }

    /// Most recent exchanges of the user, newest first
    pub async fn history(&self, owner_user_id: &str) -> Result<ChatHistoryResponseDto> {
        let history: Vec<ChatLogDto> = self
            .chat_logs
            .history(owner_user_id, HISTORY_LIMIT)
            .await?
            .into_iter()
            .map(ChatLogDto::from)
            .collect();

        Ok(ChatHistoryResponseDto {
            count: history.len(),
            history,
        })
    }

    /// Prior turns of a conversation, oldest first
    ///
    /// A failed read degrades to an empty history.
    async fn conversation_turns(&self, owner_user_id: &str, conversation_id: &str) -> Vec<ChatMessage> {
        match self
            .chat_logs
            .recent_in_conversation(owner_user_id, conversation_id, CONVERSATION_WINDOW)
            .await
        {
            Ok(logs) => turns_from_logs(logs),
            Err(e) => {
                warn!(
                    "Failed to load conversation history for {}: {}",
                    conversation_id, e
                );
                Vec::new()
            }
        }
    }

    async fn record(&self, log: NewChatLog) {
        match self.chat_logs.create(log).await {
            Ok(saved) => info!(
                "Chat log stored: id={}, owner={}, conversation={:?}",
                saved.id, saved.owner_user_id, saved.conversation_id
            ),
            Err(e) => warn!("Failed to store chat log: {}", e),
        }
    }
}

/// Turn newest-first logs into chronological user/assistant turns
fn turns_from_logs(logs: Vec<ChatLog>) -> Vec<ChatMessage> {
    logs.into_iter()
        .rev()
        .flat_map(|log| {
            let user = Some(log.user_message)
                .filter(|text| !text.is_empty())
                .map(ChatMessage::user);
            let assistant = Some(log.response_text)
                .filter(|text| !text.is_empty())
                .map(ChatMessage::assistant);
            user.into_iter().chain(assistant)
        })
        .collect()
}
