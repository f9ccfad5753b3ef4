use crate::modules::llm::{ChatMessage, ChatRole};
use crate::shared::llm::{ChatEnvelope, LlmResponse};
use crate::shared::prompts::{render_chat_system_prompt, render_chat_user_prompt, TemplateError};

/// Everything the final user turn is built from
#[derive(Debug)]
pub struct PromptInput<'a> {
    pub message: &'a str,
    pub documents_context: &'a str,
    pub include_chart: bool,
    pub document_ids: &'a [i64],
}

/// Build the ordered message sequence for one chat request
///
/// System instruction first, then the prior turns, then the current user
/// turn carrying the header, document context and question. Prior turns with
/// blank content or a role other than user/assistant are skipped.
pub fn build_messages(
    input: &PromptInput<'_>,
    history: &[ChatMessage],
) -> Result<Vec<ChatMessage>, TemplateError> {
    let schema = ChatEnvelope::json_schema_string();
    let system = render_chat_system_prompt(Some(&schema))?;

    let user = render_chat_user_prompt(
        input.message,
        input.documents_context,
        input.include_chart,
        input.document_ids,
    )?;

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(
        history
            .iter()
            .filter(|turn| matches!(turn.role, ChatRole::User | ChatRole::Assistant))
            .filter(|turn| !turn.content.trim().is_empty())
            .cloned(),
    );
    messages.push(ChatMessage::user(user));

    Ok(messages)
}
