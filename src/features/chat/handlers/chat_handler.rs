use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::chat::dtos::{ChatHistoryResponseDto, ChatRequestDto};
use crate::features::chat::services::ChatService;
use crate::shared::llm::ChatEnvelope;
use crate::shared::types::ErrorResponse;

/// Ask a question about the uploaded documents
///
/// Returns `{text, chart}` where `chart` is a Chart.js configuration or null.
/// Pass the same `conversation_id` to continue a conversation.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequestDto,
    responses(
        (status = 200, description = "Assistant answer", body = ChatEnvelope),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 502, description = "LLM provider failed", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn chat(
    user: AuthenticatedUser,
    State(service): State<Arc<ChatService>>,
    AppJson(payload): AppJson<ChatRequestDto>,
) -> Result<Json<ChatEnvelope>, AppError> {
    let envelope = service.chat(&user.user_id, payload).await?;
    Ok(Json(envelope))
}

/// Recent chat exchanges of the current user, newest first
#[utoipa::path(
    get,
    path = "/api/chat/history",
    tag = "chat",
    responses(
        (status = 200, description = "Chat history", body = ChatHistoryResponseDto),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_chat_history(
    user: AuthenticatedUser,
    State(service): State<Arc<ChatService>>,
) -> Result<Json<ChatHistoryResponseDto>, AppError> {
    Ok(Json(service.history(&user.user_id).await?))
}
