use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::chat::handlers::{chat, get_chat_history};
use crate::features::chat::services::ChatService;

pub fn routes(chat_service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat/history", get(get_chat_history))
        .with_state(chat_service)
}
