//! Command implementations.

pub mod extract;
pub mod parse;
pub mod prompt;
pub mod review;
pub mod schema;

pub use self::extract::execute_extract;
pub use self::parse::execute_parse;
pub use self::prompt::execute_prompt;
pub use self::review::execute_review;
pub use self::schema::execute_schema;

use crate::credentials;
use crate::error::Result;
use pactum_extractor::{Extractor, ExtractorConfig, ExtractorError};
use pactum_llm::GeminiProvider;
use tracing::debug;

/// Build a Gemini-backed extractor, resolving the API key first.
pub(crate) fn gemini_extractor(config: ExtractorConfig) -> Result<Extractor<GeminiProvider>> {
    let api_key = credentials::api_key()?;
    let schema = config.load_schema()?;
    let provider =
        GeminiProvider::new(&config.endpoint, &config.model, api_key).map_err(ExtractorError::from)?;
    debug!("Using model {} with schema '{}'", config.model, schema.name());
    Ok(Extractor::new(provider, schema, config))
}
