//! Core Extractor implementation

use crate::cache::{CachedExtraction, ResultCache};
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response_detailed;
use crate::prompt::PromptBuilder;
use crate::reader::read_document;
use crate::types::{Extraction, ExtractionMetadata, ExtractionRequest, FieldAnomaly};
use pactum_domain::traits::LlmProvider;
use pactum_domain::{ExtractionResult, LlmOutcome, Scalar, Schema};
use pactum_llm::GeminiProvider;
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// The Extractor fills a schema from contract text using an LLM
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    schema: Schema,
    config: ExtractorConfig,
    cache: ResultCache,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Into<ExtractorError>,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, schema: Schema, config: ExtractorConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            schema,
            config,
            cache: ResultCache::new(),
        }
    }

    /// Schema prompts are built from
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Session result cache
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Read a contract file and extract its fields
    pub async fn extract_file(&self, path: &Path) -> Result<Extraction, ExtractorError> {
        info!("Reading contract file: {}", path.display());
        let text = read_document(path)?;
        info!("Successfully read contract file. Length: {} characters.", text.chars().count());

        let source_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.extract(ExtractionRequest::new(text, source_id)).await
    }

    /// Extract schema fields from contract text
    pub async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, ExtractorError> {
        if request.text.trim().is_empty() {
            return Err(ExtractorError::InvalidInput(
                "Contract text cannot be empty.".to_string(),
            ));
        }

        let text_chars = request.text.chars().count();
        if text_chars > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                text_chars,
                self.config.max_text_length,
            ));
        }

        let cache_key = ResultCache::key(
            self.schema.name(),
            self.llm_provider.model_name(),
            &request.text,
        );
        if self.config.cache_results {
            if let Some(hit) = self.cache.get(&cache_key) {
                info!("Reusing cached extraction for source '{}'", request.source_id);
                let mut metadata = hit.metadata;
                metadata.source_id = request.source_id;
                metadata.cached = true;
                return Ok(Extraction {
                    result: hit.result,
                    anomalies: hit.anomalies,
                    metadata,
                });
            }
        }

        info!(
            "Starting extraction for source '{}' with schema '{}', text length {}",
            request.source_id,
            self.schema.name(),
            text_chars
        );
        let start_time = Instant::now();

        let prompt = PromptBuilder::new(&self.schema).build(&request.text);
        debug!("Prompt length: {} chars", prompt.len());

        let outcome = timeout(self.config.extraction_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| {
                error!(
                    "Extraction timed out after {}s",
                    self.config.extraction_timeout_secs
                );
                ExtractorError::Timeout
            })??;

        let response_text = resolve_outcome(outcome)?;
        debug!("LLM response length: {} chars", response_text.len());

        let parsed = parse_response_detailed(&response_text)?;
        let (result, anomalies) = reconcile(&self.schema, parsed.result, parsed.anomalies);

        let metadata = ExtractionMetadata {
            source_id: request.source_id,
            schema: self.schema.name().to_string(),
            model_name: self.llm_provider.model_name().to_string(),
            timestamp: unix_now(),
            prompt_chars: prompt.chars().count(),
            response_chars: response_text.chars().count(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            cached: false,
        };

        info!(
            "Extraction complete: {} fields, {} anomalies, {}ms",
            result.len(),
            anomalies.len(),
            metadata.processing_time_ms
        );

        if self.config.cache_results {
            self.cache.insert(
                cache_key,
                CachedExtraction {
                    result: result.clone(),
                    anomalies: anomalies.clone(),
                    metadata: metadata.clone(),
                },
            );
        }

        Ok(Extraction {
            result,
            anomalies,
            metadata,
        })
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: &str) -> Result<LlmOutcome, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);
        let prompt = prompt.to_string();

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || llm.generate(&prompt).map_err(Into::into))
            .await
            .map_err(|e| ExtractorError::Generation(format!("Task join error: {}", e)))?
    }
}

/// Turn the provider's classified reply into response text
fn resolve_outcome(outcome: LlmOutcome) -> Result<String, ExtractorError> {
    match outcome {
        LlmOutcome::Text(text) => Ok(text),
        LlmOutcome::Blocked { reason } => {
            error!("LLM content generation blocked. Reason: {}", reason);
            Err(ExtractorError::GenerationBlocked { reason })
        }
        LlmOutcome::Malformed(detail) => {
            error!("Unexpected response structure from LLM: {}", detail);
            Err(ExtractorError::Generation(format!(
                "Could not extract text from LLM response: {}",
                detail
            )))
        }
    }
}

/// Append schema fields the model omitted and flag fields it invented
///
/// Response order is kept; omitted fields follow in schema order as null.
fn reconcile(
    schema: &Schema,
    mut result: ExtractionResult,
    mut anomalies: Vec<FieldAnomaly>,
) -> (ExtractionResult, Vec<FieldAnomaly>) {
    for field in result.keys() {
        if schema.entry(field).is_none() {
            debug!("Response field '{}' is not in schema '{}'", field, schema.name());
            anomalies.push(FieldAnomaly::UnexpectedField {
                field: field.to_string(),
            });
        }
    }

    for name in schema.field_names() {
        if !result.contains(name) {
            warn!("Field '{}' missing from response, setting null", name);
            anomalies.push(FieldAnomaly::MissingField {
                field: name.to_string(),
            });
            result.insert(name, Scalar::Null);
        }
    }

    (result, anomalies)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One-shot extraction against Gemini
///
/// Validates inputs, builds the provider and schema from `config`, and
/// returns the flattened result.
pub async fn get_contract_data(
    contract_text: &str,
    api_key: &str,
    config: &ExtractorConfig,
) -> Result<ExtractionResult, ExtractorError> {
    if contract_text.trim().is_empty() {
        return Err(ExtractorError::InvalidInput(
            "Contract text cannot be empty.".to_string(),
        ));
    }
    if api_key.trim().is_empty() {
        return Err(ExtractorError::InvalidInput(
            "API key must be provided.".to_string(),
        ));
    }

    config.validate().map_err(ExtractorError::Configuration)?;
    let schema = config.load_schema()?;

    let provider = GeminiProvider::new(&config.endpoint, &config.model, api_key).map_err(|e| {
        error!("Error initializing Gemini model ({}): {}", config.model, e);
        ExtractorError::Configuration(format!(
            "Error initializing Gemini model ({}): {}. Check API key and model name.",
            config.model, e
        ))
    })?;

    let extractor = Extractor::new(provider, schema, config.clone());
    let extraction = extractor
        .extract(ExtractionRequest::new(contract_text, "contract"))
        .await?;
    Ok(extraction.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use pactum_domain::SchemaVersion;
    use pactum_llm::{LlmError, MockProvider};

    const PARTIAL_REPLY: &str = r#"```json
{
  "Partner Name": {"value": "Acme Health"},
  "Bonus Field": {"value": 7}
}
```"#;

    fn create_test_extractor(llm: MockProvider) -> Extractor<MockProvider> {
        Extractor::new(
            llm,
            Schema::builtin(SchemaVersion::Batch),
            ExtractorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_missing_fields_are_appended_as_null() {
        let extractor = create_test_extractor(MockProvider::new(PARTIAL_REPLY));
        let schema_len = extractor.schema().len();

        let extraction = extractor
            .extract(ExtractionRequest::new("Some contract", "doc_1"))
            .await
            .unwrap();

        let keys: Vec<_> = extraction.result.keys().collect();
        assert_eq!(keys[0], "Partner Name");
        assert_eq!(keys[1], "Bonus Field");
        assert_eq!(extraction.result.len(), schema_len + 1);
        assert_eq!(
            extraction.result.get("Partner Name"),
            Some(&Scalar::Text("Acme Health".into()))
        );
        assert_eq!(extraction.result.get("Trial period"), Some(&Scalar::Null));

        assert!(extraction
            .anomalies
            .contains(&FieldAnomaly::UnexpectedField { field: "Bonus Field".into() }));
        assert!(extraction
            .anomalies
            .contains(&FieldAnomaly::MissingField { field: "Trial period".into() }));
    }

    #[tokio::test]
    async fn test_metadata() {
        let extractor =
            create_test_extractor(MockProvider::new(PARTIAL_REPLY).with_model_name("gemini-test"));
        let extraction = extractor
            .extract(ExtractionRequest::new("Some contract", "doc_1"))
            .await
            .unwrap();

        assert_eq!(extraction.metadata.source_id, "doc_1");
        assert_eq!(extraction.metadata.schema, "batch");
        assert_eq!(extraction.metadata.model_name, "gemini-test");
        assert_eq!(extraction.metadata.response_chars, PARTIAL_REPLY.chars().count());
        assert!(extraction.metadata.prompt_chars > "Some contract".len());
        assert!(!extraction.metadata.cached);
    }

    #[tokio::test]
    async fn test_empty_text_rejected_before_call() {
        let llm = MockProvider::new(PARTIAL_REPLY);
        let extractor = create_test_extractor(llm.clone());

        let result = extractor.extract(ExtractionRequest::new("  \n", "doc")).await;
        assert!(matches!(result, Err(ExtractorError::InvalidInput(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_text_too_long() {
        let extractor = Extractor::new(
            MockProvider::new(PARTIAL_REPLY),
            Schema::builtin(SchemaVersion::Batch),
            ExtractorConfig {
                max_text_length: 10,
                ..Default::default()
            },
        );

        let result = extractor
            .extract(ExtractionRequest::new("a".repeat(11), "doc"))
            .await;
        assert!(matches!(result, Err(ExtractorError::TextTooLong(11, 10))));
    }

    #[tokio::test]
    async fn test_blocked_reply() {
        let extractor = create_test_extractor(MockProvider::blocked("SAFETY"));
        let err = extractor
            .extract(ExtractionRequest::new("text", "doc"))
            .await
            .unwrap_err();

        match &err {
            ExtractorError::GenerationBlocked { reason } => assert_eq!(reason, "SAFETY"),
            other => panic!("Expected GenerationBlocked, got {:?}", other),
        }
        assert!(err.is_generation());
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_malformed_reply() {
        let extractor = create_test_extractor(MockProvider::malformed("no candidates"));
        let result = extractor.extract(ExtractionRequest::new("text", "doc")).await;
        assert!(matches!(result, Err(ExtractorError::Generation(_))));
    }

    #[tokio::test]
    async fn test_provider_errors_are_classified() {
        let extractor = create_test_extractor(MockProvider::failing(LlmError::Authentication(
            "API key not valid".into(),
        )));
        let result = extractor.extract(ExtractionRequest::new("text", "doc")).await;
        assert!(matches!(result, Err(ExtractorError::Configuration(_))));

        let extractor = create_test_extractor(MockProvider::failing(LlmError::Communication(
            "connection reset".into(),
        )));
        let result = extractor.extract(ExtractionRequest::new("text", "doc")).await;
        assert!(matches!(result, Err(ExtractorError::Generation(_))));
    }

    #[tokio::test]
    async fn test_unparseable_reply() {
        let extractor = create_test_extractor(MockProvider::new("I could not find any fields."));
        let result = extractor.extract(ExtractionRequest::new("text", "doc")).await;
        assert!(matches!(
            result,
            Err(ExtractorError::Parsing(ParseError::NoJsonFound))
        ));
    }

    #[tokio::test]
    async fn test_cache_reuses_result() {
        let llm = MockProvider::new(PARTIAL_REPLY);
        let extractor = create_test_extractor(llm.clone());

        let first = extractor
            .extract(ExtractionRequest::new("Same contract", "a.pdf"))
            .await
            .unwrap();
        let second = extractor
            .extract(ExtractionRequest::new("Same contract", "b.pdf"))
            .await
            .unwrap();

        assert_eq!(llm.call_count(), 1);
        assert_eq!(first.result, second.result);
        assert!(second.metadata.cached);
        assert_eq!(second.metadata.source_id, "b.pdf");
        assert_eq!(extractor.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_disabled() {
        let llm = MockProvider::new(PARTIAL_REPLY);
        let extractor = Extractor::new(
            llm.clone(),
            Schema::builtin(SchemaVersion::Batch),
            ExtractorConfig {
                cache_results: false,
                ..Default::default()
            },
        );

        for _ in 0..2 {
            extractor
                .extract(ExtractionRequest::new("Same contract", "doc"))
                .await
                .unwrap();
        }
        assert_eq!(llm.call_count(), 2);
        assert!(extractor.cache().is_empty());
    }

    #[tokio::test]
    async fn test_get_contract_data_validates_inputs() {
        let config = ExtractorConfig::default();

        let result = get_contract_data("", "key", &config).await;
        assert!(matches!(result, Err(ExtractorError::InvalidInput(msg)) if msg.contains("Contract text")));

        let result = get_contract_data("Contract", "", &config).await;
        assert!(matches!(result, Err(ExtractorError::InvalidInput(msg)) if msg.contains("API key")));
    }

    #[tokio::test]
    async fn test_get_contract_data_rejects_bad_schema() {
        let config = ExtractorConfig {
            schema: "unknown".to_string(),
            ..Default::default()
        };
        let result = get_contract_data("Contract", "key", &config).await;
        assert!(matches!(result, Err(ExtractorError::Configuration(_))));
    }
}
