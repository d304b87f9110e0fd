//! Configuration management for the CLI.

use crate::cli::SchemaSelection;
use crate::error::{CliError, Result};
use pactum_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Batch output destinations
    #[serde(default)]
    pub output: OutputSettings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Review history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Where batch results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Pretty-printed JSON destination
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,

    /// Two-column CSV destination
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding config, secrets and history.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".pactum"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line schema overrides and validate the result.
    pub fn extractor_config(&self, selection: &SchemaSelection, model: Option<&str>) -> Result<ExtractorConfig> {
        let mut config = self.extractor.clone();
        if let Some(schema) = &selection.schema {
            config.schema = schema.clone();
            config.schema_file = None;
        }
        if let Some(file) = &selection.schema_file {
            config.schema_file = Some(file.clone());
        }
        if let Some(model) = model {
            config.model = model.to_string();
        }
        config.validate().map_err(CliError::Config)?;
        Ok(config)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            json_path: default_json_path(),
            csv_path: default_csv_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_json_path() -> PathBuf {
    PathBuf::from("contract_output.json")
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("contract_output.csv")
}
