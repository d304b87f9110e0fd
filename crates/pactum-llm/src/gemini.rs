//! Gemini Provider Implementation
//!
//! Calls Google's `generateContent` REST endpoint and classifies the reply
//! into an [`LlmOutcome`].
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini API
//! - Configurable endpoint and model
//! - Retry with exponential backoff on rate limits and server errors
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use pactum_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new(
//!     "https://generativelanguage.googleapis.com",
//!     "models/gemini-2.5-pro-preview-03-25",
//!     "api-key",
//! ).unwrap();
//! ```

use crate::LlmError;
use pactum_domain::traits::LlmProvider as LlmProviderTrait;
use pactum_domain::LlmOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-pro-preview-03-25";

/// Default timeout for LLM requests (contract prompts are long)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the generateContent API
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response from the generateContent API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Finish reasons that mean the candidate was withheld by filtering
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

/// Map a decoded reply onto the three outcomes
///
/// Text wins if present; otherwise a prompt-level block reason, then a
/// candidate-level blocking finish reason.
pub(crate) fn classify_response(response: GenerateContentResponse) -> LlmOutcome {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default();

    if !text.is_empty() {
        return LlmOutcome::Text(text);
    }

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return LlmOutcome::Blocked { reason };
    }

    match response.candidates.first() {
        Some(Candidate {
            finish_reason: Some(reason),
            ..
        }) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => LlmOutcome::Blocked {
            reason: reason.clone(),
        },
        Some(_) => LlmOutcome::Malformed("candidate carried no text".to_string()),
        None => LlmOutcome::Malformed("response had no candidates".to_string()),
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://generativelanguage.googleapis.com")
    /// - `model`: Model resource name (e.g., "models/gemini-2.5-pro-preview-03-25")
    /// - `api_key`: Gemini API key
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Authentication("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: normalize_model(model.into()),
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider against the public endpoint
    pub fn default_endpoint(
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model, api_key)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn url(&self) -> String {
        format!("{}/v1beta/{}:generateContent", self.endpoint, self.model)
    }

    /// Generate content for a prompt
    ///
    /// # Errors
    ///
    /// - `Authentication` on 401/403
    /// - `ModelNotAvailable` on 404
    /// - `RateLimitExceeded` when 429 persists across all retries
    /// - `Communication` on network failures and other HTTP errors
    /// - `InvalidResponse` when the body is not a generateContent reply
    pub async fn generate_content(&self, prompt: &str) -> Result<LlmOutcome, LlmError> {
        let url = self.url();

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response
                            .json::<GenerateContentResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                            })?;
                        let outcome = classify_response(body);
                        debug!(model = %self.model, blocked = outcome.is_blocked(), "Gemini call finished");
                        return Ok(outcome);
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    match status {
                        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                            return Err(LlmError::Authentication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                        reqwest::StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(self.model.clone()));
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(LlmError::RateLimitExceeded);
                        }
                        s if s.is_server_error() => {
                            last_error = Some(LlmError::Communication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                        _ => {
                            return Err(LlmError::Communication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(
                    "Gemini call attempt {} failed, retrying after {}s",
                    attempts,
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

/// Accept both "gemini-x" and "models/gemini-x"
fn normalize_model(model: String) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model
    } else {
        format!("models/{}", model)
    }
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<LlmOutcome, Self::Error> {
        // Blocking wrapper: reuse the ambient runtime from a blocking task,
        // otherwise spin up a private one
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.generate_content(prompt)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.generate_content(prompt)),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
