//! Error types for the Extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The contract document could not be read
    #[error("Source read error: {0}")]
    SourceRead(#[from] SourceReadError),

    /// Credential, model or schema setup is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model call failed
    #[error("LLM generation error: {0}")]
    Generation(String),

    /// The model's output was suppressed by safety filtering
    #[error("Content generation blocked due to safety settings. Reason: {reason}")]
    GenerationBlocked {
        /// Block reason reported by the provider
        reason: String,
    },

    /// No usable JSON in the model's output
    #[error("JSON parsing error: {0}")]
    Parsing(#[from] ParseError),

    /// Caller passed an empty contract text or credential
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Extraction timeout
    #[error("Extraction timeout")]
    Timeout,

    /// Writing results failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistError),
}

impl ExtractorError {
    /// True for transport failures and safety blocks
    pub fn is_generation(&self) -> bool {
        matches!(
            self,
            ExtractorError::Generation(_) | ExtractorError::GenerationBlocked { .. } | ExtractorError::Timeout
        )
    }
}

/// Errors from the recovery parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Nothing to parse
    #[error("Invalid or empty response text received")]
    EmptyResponse,

    /// No fenced block and no `{ ... }` span
    #[error("Could not find valid JSON structure in the LLM response")]
    NoJsonFound,

    /// The isolated candidate is not valid JSON
    #[error("Error decoding JSON from LLM response: {message}")]
    Decode {
        /// Decoder message
        message: String,
        /// The text that failed to decode
        candidate: String,
    },

    /// Valid JSON, but not an object at the top level
    #[error("Parsed JSON is not an object. Found type: {found}")]
    NotAnObject {
        /// JSON type that was found instead
        found: &'static str,
    },
}

/// Errors from the document reader
#[derive(Error, Debug)]
pub enum SourceReadError {
    /// Path does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Underlying I/O failure
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path being read
        path: PathBuf,
        /// I/O error
        source: std::io::Error,
    },

    /// The PDF is corrupt, encrypted or otherwise undecodable
    #[error("Invalid PDF file or structure: {0}")]
    InvalidPdf(String),

    /// A text document that is not UTF-8
    #[error("Text file is not valid UTF-8: {0}")]
    NotUtf8(PathBuf),

    /// Extension the reader does not handle
    #[error("Unsupported input type: {0}")]
    Unsupported(String),
}

/// Errors while writing results
#[derive(Error, Debug)]
pub enum PersistError {
    /// File write failure
    #[error("I/O error writing {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// I/O error
        source: std::io::Error,
    },

    /// JSON serialization failure
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failure
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<pactum_llm::LlmError> for ExtractorError {
    fn from(e: pactum_llm::LlmError) -> Self {
        if e.is_configuration() {
            ExtractorError::Configuration(e.to_string())
        } else {
            ExtractorError::Generation(e.to_string())
        }
    }
}
