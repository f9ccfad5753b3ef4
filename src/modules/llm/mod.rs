//! Chat-completion gateway
//!
//! [`CompletionClient`] is the seam the chat service talks to; production
//! uses [`DeepSeekClient`], tests substitute a scripted client.

mod deepseek_client;

pub use deepseek_client::DeepSeekClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversation role understood by OpenAI-compatible chat APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Failures of a completion round-trip
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to reach LLM provider: {0}")]
    Connection(String),

    #[error("LLM provider did not answer in time")]
    Timeout,

    #[error("LLM provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM provider returned no message content")]
    EmptyContent,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the ordered messages and return the assistant's raw text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError>;
}
