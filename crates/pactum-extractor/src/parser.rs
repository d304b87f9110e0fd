//! Recover the extraction result from free-form LLM output
//!
//! Models are told to return bare JSON but often wrap it in a ```json fence
//! or surround it with commentary. Recovery tries the first fenced block,
//! then falls back to the span from the first `{` to the last `}`. Prose
//! containing stray braces outside the object corrupts that span; this is a
//! known limitation of the fallback.

use crate::error::ParseError;
use crate::types::{FieldAnomaly, ParsedResponse};
use pactum_domain::{ExtractionResult, Scalar};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, error, warn};

/// First ```json fenced object, case-insensitive, spanning newlines
static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```json\s*(\{.*?\})\s*```").expect("fence pattern is valid")
});

/// Characters of raw output kept in log lines
const LOG_PREVIEW_CHARS: usize = 500;

/// Parse an LLM response into a flat field -> value mapping
///
/// Field anomalies are logged and dropped; use [`parse_response_detailed`]
/// to inspect them.
pub fn parse_response(raw: &str) -> Result<ExtractionResult, ParseError> {
    parse_response_detailed(raw).map(|parsed| parsed.result)
}

/// [`parse_response`] for callers holding a possibly-absent response
pub fn parse_optional_response(raw: Option<&str>) -> Result<ExtractionResult, ParseError> {
    parse_response(raw.ok_or(ParseError::EmptyResponse)?)
}

/// Parse an LLM response, keeping the per-field anomalies
pub fn parse_response_detailed(raw: &str) -> Result<ParsedResponse, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let candidate = match extract_json_candidate(raw) {
        Some(candidate) => candidate,
        None => {
            error!(
                "Could not find JSON block in response. Raw response: {}...",
                preview(raw)
            );
            return Err(ParseError::NoJsonFound);
        }
    };

    let decoded: Value = serde_json::from_str(candidate).map_err(|e| {
        error!("JSON decode failed: {}. Raw string: {}...", e, preview(candidate));
        ParseError::Decode {
            message: e.to_string(),
            candidate: candidate.to_string(),
        }
    })?;

    let object = match decoded {
        Value::Object(object) => object,
        other => {
            return Err(ParseError::NotAnObject {
                found: json_type_name(&other),
            })
        }
    };

    let mut result = ExtractionResult::new();
    let mut anomalies = Vec::new();

    for (field, entry) in object {
        let value = match entry {
            Value::Object(mut descriptor) => match descriptor.remove("value") {
                Some(value) => Scalar::from_json(value),
                None => {
                    debug!("Field '{}' has no 'value' key, treating as null", field);
                    anomalies.push(FieldAnomaly::MissingValueKey {
                        field: field.clone(),
                    });
                    Scalar::Null
                }
            },
            raw_value => {
                warn!(
                    "Unexpected structure for key '{}' in parsed JSON. Expected object, got {}. Using raw value: {}",
                    field,
                    json_type_name(&raw_value),
                    raw_value
                );
                anomalies.push(FieldAnomaly::NotAnObject {
                    field: field.clone(),
                    found: json_type_name(&raw_value),
                });
                Scalar::from_json(raw_value)
            }
        };

        if !value.is_plain() {
            warn!("Field '{}' holds a {} value", field, value.type_name());
            anomalies.push(FieldAnomaly::NonScalarValue {
                field: field.clone(),
                found: value.type_name(),
            });
        }

        result.insert(field, value);
    }

    Ok(ParsedResponse { result, anomalies })
}

/// Isolate the JSON object text inside a response
///
/// Returns the trimmed fenced capture if a ```json block exists, otherwise
/// the first-`{`-to-last-`}` slice.
pub fn extract_json_candidate(raw: &str) -> Option<&str> {
    let candidate = match FENCED_JSON.captures(raw).and_then(|c| c.get(1)) {
        Some(fenced) => fenced.as_str().trim(),
        None => {
            let start = raw.find('{')?;
            let end = raw.rfind('}')?;
            if end <= start {
                return None;
            }
            raw[start..=end].trim()
        }
    };

    (!candidate.is_empty()).then_some(candidate)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
