//! Pactum Extractor
//!
//! Fills a contract field schema from unstructured contract text using an LLM.
//!
//! # Architecture
//!
//! ```text
//! PDF/Text → Reader → PromptBuilder → LLM → Recovery Parser → ExtractionResult → JSON/CSV
//! ```
//!
//! # Key Features
//!
//! - **Prompt Construction**: Instruction preamble, per-field descriptors and delimited contract text
//! - **Response Recovery**: Tolerates fenced blocks, commentary and missing `value` keys
//! - **Schema Reconciliation**: Omitted fields are appended as null and reported
//! - **Session Cache**: Identical text against the same schema and model is extracted once
//!
//! # Example Usage
//!
//! ```no_run
//! use pactum_extractor::{Extractor, ExtractorConfig, ExtractionRequest};
//! use pactum_domain::{Schema, SchemaVersion};
//! use pactum_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"Partner Name": {"value": "Acme Health"}}"#);
//! let schema = Schema::builtin(SchemaVersion::Batch);
//! let extractor = Extractor::new(llm, schema, ExtractorConfig::default());
//!
//! let extraction = extractor
//!     .extract(ExtractionRequest::new("Subscriber: Acme Health", "doc_001"))
//!     .await?;
//!
//! println!("{}", pactum_extractor::persist::to_pretty_json(&extraction.result)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod extractor;
mod parser;
pub mod persist;
mod prompt;
pub mod reader;
mod types;


pub use cache::ResultCache;
pub use config::ExtractorConfig;
pub use error::{ExtractorError, ParseError, PersistError, SourceReadError};
pub use extractor::{get_contract_data, Extractor};
pub use parser::{
    extract_json_candidate, parse_optional_response, parse_response, parse_response_detailed,
};
pub use prompt::{build_prompt, PromptBuilder, CONTRACT_END, CONTRACT_START};
pub use reader::{read_document, read_pdf_bytes, DocumentKind};
pub use types::{Extraction, ExtractionMetadata, ExtractionRequest, FieldAnomaly, ParsedResponse};
