pub mod constants;
pub mod llm;
pub mod prompts;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
