//! API key discovery.
//!
//! Lookup order: `GEMINI_API_KEY`, then `GOOGLE_API_KEY` (either may come from
//! a `.env` file loaded at startup), then `GEMINI_API_KEY` in
//! `~/.pactum/secrets.toml`.

use crate::config::Config;
use crate::error::{CliError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Environment variables consulted, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Key name inside the secrets file.
const SECRETS_KEY: &str = "GEMINI_API_KEY";

/// Default secrets file location.
pub fn secrets_path() -> Result<PathBuf> {
    Ok(Config::dir()?.join("secrets.toml"))
}

/// Load `.env` from the working directory, if present.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env loaded: {}", e),
    }
}

/// Resolve the API key from the process environment and the default secrets file.
pub fn api_key() -> Result<String> {
    let secrets = secrets_path().ok();
    resolve_api_key(|name| std::env::var(name).ok(), secrets.as_deref())
}

/// Resolve the API key from `env` and, failing that, `secrets`.
///
/// Blank values count as missing.
pub fn resolve_api_key<F>(env: F, secrets: Option<&Path>) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    for name in API_KEY_VARS {
        if let Some(key) = env(name).filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from {}", name);
            return Ok(key.trim().to_string());
        }
    }

    if let Some(path) = secrets.filter(|p| p.exists()) {
        let contents = fs::read_to_string(path)?;
        let table: HashMap<String, toml::Value> = toml::from_str(&contents)?;
        if let Some(key) = table
            .get(SECRETS_KEY)
            .and_then(toml::Value::as_str)
            .filter(|k| !k.trim().is_empty())
        {
            debug!("Using API key from {}", path.display());
            return Ok(key.trim().to_string());
        }
    }

    error!("Gemini API key not found");
    Err(CliError::Config(format!(
        "Gemini API key not found. Set {} (or {}) in the environment or a .env file, or add {} to ~/.pactum/secrets.toml.",
        API_KEY_VARS[0], API_KEY_VARS[1], SECRETS_KEY
    )))
}
