//! Prompt template management module.
//!
//! Templates are stored in `templates/prompts/` and use Jinja2 syntax.
//!
//! # Usage
//!
//! ```ignore
//! use crate::shared::prompts::{render_chat_system_prompt, render_chat_user_prompt};
//!
//! let system = render_chat_system_prompt(None)?;
//! let user = render_chat_user_prompt("berapa target NPS Q3?", "(Tidak ada dokumen konteks)", false, &[])?;
//! ```

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::Value;
use std::collections::HashMap;

/// Format document ids the way the prompt header shows them, e.g. `[3, 1]`
fn format_document_ids(document_ids: &[i64]) -> String {
    let ids: Vec<String> = document_ids.iter().map(|id| id.to_string()).collect();
    format!("[{}]", ids.join(", "))
}

/// Render the fixed system instruction for the document chat assistant.
///
/// # Arguments
/// * `output_schema` - Optional JSON schema of the expected reply appended to the rules
pub fn render_chat_system_prompt(output_schema: Option<&str>) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("output_schema", Value::from(output_schema.unwrap_or("")));

    render_template("chat/system.jinja", &ctx)
}

/// Render the final user turn: machine-readable header, context block, then the question.
pub fn render_chat_user_prompt(
    message: &str,
    documents_context: &str,
    include_chart: bool,
    document_ids: &[i64],
) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("message", Value::from(message));
    ctx.insert("documents_context", Value::from(documents_context));
    // minijinja prints booleans as `True`/`False`; the header uses JSON literals
    ctx.insert(
        "include_chart",
        Value::from(if include_chart { "true" } else { "false" }),
    );
    ctx.insert(
        "document_ids",
        Value::from(format_document_ids(document_ids)),
    );

    render_template("chat/user.jinja", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_section_order() {
        let prompt =
            render_chat_user_prompt("berapa target NPS Q3?", "<DOC id=\"7\">", true, &[7, 3])
                .unwrap();

        assert!(prompt.starts_with("INCLUDE_CHART: true\nDOCUMENT_IDS: [7, 3]\n"));
        let header = prompt.find("DOCUMENT_IDS").unwrap();
        let context = prompt.find("<DOC id=\"7\">").unwrap();
        let message = prompt.find("berapa target NPS Q3?").unwrap();
        assert!(header < context && context < message);
        assert!(prompt.ends_with("USER_MESSAGE:\nberapa target NPS Q3?"));
    }

    #[test]
    fn test_user_prompt_empty_document_ids() {
        let prompt = render_chat_user_prompt("halo", "ctx", false, &[]).unwrap();
        assert!(prompt.contains("INCLUDE_CHART: false"));
        assert!(prompt.contains("DOCUMENT_IDS: []"));
    }

    #[test]
    fn test_include_chart_flag_is_lowercase() {
        let off = render_chat_user_prompt("halo", "ctx", false, &[1]).unwrap();
        assert!(off.starts_with("INCLUDE_CHART: false\nDOCUMENT_IDS: [1]\n"));
        assert!(!off.contains("False"));

        let on = render_chat_user_prompt("grafik", "ctx", true, &[1]).unwrap();
        assert!(on.starts_with("INCLUDE_CHART: true\n"));
        assert!(!on.contains("True"));
    }

    #[test]
    fn test_system_prompt_rules() {
        let prompt = render_chat_system_prompt(None).unwrap();
        assert!(prompt.contains("Bahasa Indonesia"));
        assert!(prompt.contains("\"text\" dan \"chart\""));
        assert!(prompt.contains("Chart.js"));
        assert!(!prompt.contains("Skema JSON output"));
    }

    #[test]
    fn test_system_prompt_with_schema() {
        let prompt = render_chat_system_prompt(Some("{\"type\":\"object\"}")).unwrap();
        assert!(prompt.contains("Skema JSON output:\n{\"type\":\"object\"}"));
    }
}
