pub mod chart_intent;
pub mod context_builder;
pub mod prompt_builder;

mod chat_service;

pub use chat_service::ChatService;
