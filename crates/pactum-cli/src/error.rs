//! Error types for the CLI application.

use pactum_extractor::{ExtractorError, ParseError, PersistError, SourceReadError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or credential error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction pipeline error
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more result files could not be written
    #[error("{0} output file(s) could not be written")]
    Output(usize),

    /// Interactive editor failure
    #[error("Editor error: {0}")]
    Editor(String),
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Extractor(e.into())
    }
}

impl From<SourceReadError> for CliError {
    fn from(e: SourceReadError) -> Self {
        CliError::Extractor(e.into())
    }
}

impl From<PersistError> for CliError {
    fn from(e: PersistError) -> Self {
        CliError::Extractor(e.into())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        CliError::Editor(e.to_string())
    }
}
