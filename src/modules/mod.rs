//! Modules layer - Infrastructure components for external integrations
//!
//! Contains document text extraction and the LLM completion gateway.

pub mod extraction;
pub mod llm;
