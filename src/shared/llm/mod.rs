//! Decoding of semi-structured LLM replies
//!
//! Models are asked for a single JSON object but occasionally wrap it in a
//! markdown fence or answer in prose. [`parse_with_fallback`] handles both.

mod parser;
mod response;

pub use parser::{parse_with_fallback, ParseError};
pub use response::{ChatEnvelope, LlmResponse};
