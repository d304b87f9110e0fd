//! Pactum LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `pactum-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Gemini `generateContent` API
//!
//! # Examples
//!
//! ```
//! use pactum_llm::MockProvider;
//! use pactum_domain::traits::LlmProvider;
//! use pactum_domain::LlmOutcome;
//!
//! let provider = MockProvider::new(r#"{"Partner Name": {"value": "Acme"}}"#);
//! let outcome = provider.generate("test prompt").unwrap();
//! assert!(matches!(outcome, LlmOutcome::Text(_)));
//! ```

#![warn(missing_docs)]

pub mod gemini;

use pactum_domain::traits::LlmProvider as LlmProviderTrait;
use pactum_domain::LlmOutcome;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API key rejected or missing
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether the error comes from setup (credential, model name) rather than the call itself
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LlmError::Authentication(_) | LlmError::ModelNotAvailable(_)
        )
    }
}

/// Canned reply for the mock
#[derive(Debug, Clone)]
enum MockReply {
    Outcome(LlmOutcome),
    Error(LlmError),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured replies without making any network calls.
///
/// # Examples
///
/// ```
/// use pactum_llm::MockProvider;
/// use pactum_domain::traits::LlmProvider;
/// use pactum_domain::LlmOutcome;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_blocked("prompt2", "SAFETY");
/// assert_eq!(provider.generate("prompt1").unwrap(), LlmOutcome::Text("response1".into()));
/// assert!(provider.generate("prompt2").unwrap().is_blocked());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    model: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed text reply for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Outcome(LlmOutcome::Text(response.into())))
    }

    /// A provider whose every reply is a safety block
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Outcome(LlmOutcome::Blocked {
            reason: reason.into(),
        }))
    }

    /// A provider whose every call fails
    pub fn failing(error: LlmError) -> Self {
        Self::with_reply(MockReply::Error(error))
    }

    /// A provider whose every reply is malformed
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Outcome(LlmOutcome::Malformed(detail.into())))
    }

    fn with_reply(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            replies: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            model: "mock".to_string(),
        }
    }

    /// Override the reported model name
    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Add a specific text reply for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.insert(prompt.into(), MockReply::Outcome(LlmOutcome::Text(response.into())));
    }

    /// Configure a safety block for a specific prompt
    pub fn add_blocked(&mut self, prompt: impl Into<String>, reason: impl Into<String>) {
        self.insert(
            prompt.into(),
            MockReply::Outcome(LlmOutcome::Blocked {
                reason: reason.into(),
            }),
        );
    }

    /// Configure an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, error: LlmError) {
        self.insert(prompt.into(), MockReply::Error(error));
    }

    fn insert(&mut self, prompt: String, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.insert(prompt, reply);
        }
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// The most recent prompt received
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.clear();
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<LlmOutcome, Self::Error> {
        self.prompts
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock lock poisoned: {}", e)))?
            .push(prompt.to_string());

        let reply = self
            .replies
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock lock poisoned: {}", e)))?
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Outcome(outcome) => Ok(outcome),
            MockReply::Error(error) => Err(error),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
