//! Configuration for the Extractor

use crate::error::ExtractorError;
use pactum_domain::{Schema, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Gemini API base URL
    pub endpoint: String,

    /// Model resource name
    pub model: String,

    /// Built-in schema version name ("batch" or "review")
    pub schema: String,

    /// Schema definition file; overrides `schema` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_file: Option<PathBuf>,

    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Reuse results for identical contract text within a session
    pub cache_results: bool,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.schema_file.is_none() && SchemaVersion::parse(&self.schema).is_none() {
            return Err(format!(
                "schema must be one of: {}",
                SchemaVersion::ALL.map(|v| v.as_str()).join(", ")
            ));
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Resolve the configured schema
    pub fn load_schema(&self) -> Result<Schema, ExtractorError> {
        if let Some(path) = &self.schema_file {
            let json = std::fs::read_to_string(path).map_err(|e| {
                ExtractorError::Configuration(format!(
                    "Failed to read schema file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom".to_string());
            return Schema::from_json_str(name, &json)
                .map_err(|e| ExtractorError::Configuration(e.to_string()));
        }

        self.schema
            .parse::<SchemaVersion>()
            .map(Schema::builtin)
            .map_err(ExtractorError::Configuration)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: pactum_llm::gemini::DEFAULT_ENDPOINT.to_string(),
            model: pactum_llm::gemini::DEFAULT_MODEL.to_string(),
            schema: SchemaVersion::Batch.as_str().to_string(),
            schema_file: None,
            max_text_length: 500_000,
            extraction_timeout_secs: 300,
            cache_results: true,
        }
    }
}
