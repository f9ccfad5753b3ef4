mod chat_log_repository;

pub use chat_log_repository::{ChatLogRepository, PgChatLogRepository};
