//! Trait definitions for external interactions
//!
//! These traits define the boundaries between extraction logic and
//! infrastructure. Implementations live in other crates.

use crate::outcome::LlmOutcome;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (pactum-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send a prompt and classify the reply
    fn generate(&self, prompt: &str) -> Result<LlmOutcome, Self::Error>;

    /// Model identifier, used for logging and cache keys
    fn model_name(&self) -> &str;
}
