//! Request and response types for extraction

use pactum_domain::ExtractionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to extract fields from one contract
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Full contract text
    pub text: String,

    /// Source identifier (file name or user-provided)
    pub source_id: String,
}

impl ExtractionRequest {
    /// Create a request
    pub fn new(text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
        }
    }
}

/// Outcome of a successful extraction
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Field name -> value, in response order with missing schema fields appended
    pub result: ExtractionResult,

    /// Per-field irregularities noticed while parsing
    pub anomalies: Vec<FieldAnomaly>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Source identifier
    pub source_id: String,

    /// Schema the prompt was built from
    pub schema: String,

    /// Name of the LLM model used
    pub model_name: String,

    /// Unix timestamp (seconds) when extraction finished
    pub timestamp: u64,

    /// Prompt size in characters
    pub prompt_chars: usize,

    /// Raw model response size in characters
    pub response_chars: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// Served from the session cache
    pub cached: bool,
}

/// Parser output before schema reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Flattened values
    pub result: ExtractionResult,

    /// Irregular fields
    pub anomalies: Vec<FieldAnomaly>,
}

/// A field that did not follow the `{"value": ...}` shape or the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldAnomaly {
    /// The field held a raw value instead of a descriptor object
    NotAnObject {
        /// Field name
        field: String,
        /// JSON type found
        found: &'static str,
    },

    /// The descriptor object had no `value` key
    MissingValueKey {
        /// Field name
        field: String,
    },

    /// The value is an array or object
    NonScalarValue {
        /// Field name
        field: String,
        /// JSON type found
        found: &'static str,
    },

    /// A schema field the model left out
    MissingField {
        /// Field name
        field: String,
    },

    /// A field the schema does not declare
    UnexpectedField {
        /// Field name
        field: String,
    },
}

impl FieldAnomaly {
    /// Name of the field concerned
    pub fn field(&self) -> &str {
        match self {
            FieldAnomaly::NotAnObject { field, .. }
            | FieldAnomaly::MissingValueKey { field }
            | FieldAnomaly::NonScalarValue { field, .. }
            | FieldAnomaly::MissingField { field }
            | FieldAnomaly::UnexpectedField { field } => field,
        }
    }
}

impl fmt::Display for FieldAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAnomaly::NotAnObject { field, found } => {
                write!(f, "'{}': expected object, got {}", field, found)
            }
            FieldAnomaly::MissingValueKey { field } => write!(f, "'{}': no value key", field),
            FieldAnomaly::NonScalarValue { field, found } => {
                write!(f, "'{}': {} value", field, found)
            }
            FieldAnomaly::MissingField { field } => write!(f, "'{}': missing from response", field),
            FieldAnomaly::UnexpectedField { field } => write!(f, "'{}': not in schema", field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_field_and_display() {
        let anomaly = FieldAnomaly::NotAnObject {
            field: "Lore users".to_string(),
            found: "number",
        };
        assert_eq!(anomaly.field(), "Lore users");
        assert_eq!(anomaly.to_string(), "'Lore users': expected object, got number");

        let missing = FieldAnomaly::MissingField {
            field: "Trial period".to_string(),
        };
        assert_eq!(missing.to_string(), "'Trial period': missing from response");
    }

    #[test]
    fn test_anomaly_serializes_tagged() {
        let anomaly = FieldAnomaly::MissingValueKey {
            field: "Eligibility".to_string(),
        };
        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["kind"], "missing_value_key");
        assert_eq!(json["field"], "Eligibility");
    }
}
