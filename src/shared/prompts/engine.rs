//! Template engine for prompt management using Jinja2 syntax.
//!
//! Templates live in `templates/prompts/` and are compiled into the binary,
//! so rendering never depends on the working directory at runtime.

use minijinja::{Environment, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Name and source of every bundled template
const TEMPLATES: &[(&str, &str)] = &[
    (
        "chat/system.jinja",
        include_str!("../../../templates/prompts/chat/system.jinja"),
    ),
    (
        "chat/user.jinja",
        include_str!("../../../templates/prompts/chat/user.jinja"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    // Block tags swallow their own line break
    env.set_trim_blocks(true);

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template with the given context.
///
/// # Arguments
/// * `template_name` - The template path relative to `templates/prompts/` (e.g., "chat/user.jinja")
/// * `ctx` - A HashMap of variable names to values
///
/// # Example
/// ```ignore
/// use std::collections::HashMap;
/// use minijinja::Value;
/// use crate::shared::prompts::render_template;
///
/// let mut ctx = HashMap::new();
/// ctx.insert("message", Value::from("berapa target NPS Q3?"));
///
/// let prompt = render_template("chat/user.jinja", &ctx)?;
/// ```
pub fn render_template(
    template_name: &str,
    ctx: &HashMap<&str, Value>,
) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    let render_ctx = Value::from_iter(ctx.iter().map(|(k, v)| (*k, v.clone())));

    template
        .render(render_ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Check if a template exists
#[cfg(test)]
fn template_exists(template_name: &str) -> bool {
    get_environment().get_template(template_name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_missing_template() {
        let ctx = HashMap::new();
        let result = render_template("nonexistent.jinja", &ctx);
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_bundled_templates_exist() {
        assert!(template_exists("chat/system.jinja"));
        assert!(template_exists("chat/user.jinja"));
        assert!(!template_exists("definitely_not_a_real_template.jinja"));
    }

    #[test]
    fn test_render_does_not_escape_html() {
        let mut ctx = HashMap::new();
        ctx.insert("include_chart", Value::from("false"));
        ctx.insert("document_ids", Value::from("[]"));
        ctx.insert("documents_context", Value::from("<DOC id=\"1\" title=\"a & b\">"));
        ctx.insert("message", Value::from("x"));

        let rendered = render_template("chat/user.jinja", &ctx).unwrap();
        assert!(rendered.contains("<DOC id=\"1\" title=\"a & b\">"));
    }
}
