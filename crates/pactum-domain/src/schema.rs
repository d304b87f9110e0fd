//! Schema module - the field descriptors a prompt asks the model to fill
//!
//! A schema is an ordered list of entries. Each entry carries the text that
//! goes into the prompt (description, type label, accepted values, value
//! placeholder) and a [`FieldKind`] that drives how the field is edited.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::version::SchemaVersion;

/// Errors raised while loading a schema definition
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The definition is not valid JSON
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The definition parsed but has no fields
    #[error("Schema '{0}' defines no fields")]
    Empty(String),

    /// A field asks for a widget that does not exist
    #[error("Unknown widget '{widget}' for field '{field}'")]
    UnknownWidget {
        /// Field name
        field: String,
        /// Widget name found in the definition
        widget: String,
    },

    /// A select widget without accepted values
    #[error("Field '{0}' is a select but lists no accepted_values")]
    EmptySelect(String),
}

/// How a field is edited in the review form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Integer input with a lower bound
    Number {
        /// Smallest accepted value, also the fallback when coercion fails
        min: i64,
    },
    /// Calendar date stored as MM/DD/YYYY
    Date,
    /// true / false / not specified
    TriStateBoolean,
    /// One of a fixed set of options, or not specified
    Enumerated(Vec<String>),
}

impl FieldKind {
    /// Derive the editing kind from the declared type label
    ///
    /// Accepted values always win. Mixed labels such as `Integer or Boolean`
    /// fall back to text.
    pub fn infer(type_label: &str, accepted_values: &[Option<String>]) -> Self {
        let options: Vec<String> = accepted_values.iter().flatten().cloned().collect();
        if !options.is_empty() {
            return FieldKind::Enumerated(options);
        }

        match type_label.trim() {
            "Integer" | "$ Integer" => FieldKind::Number { min: 0 },
            "MM/DD/YYYY" => FieldKind::Date,
            "Boolean" => FieldKind::TriStateBoolean,
            _ => FieldKind::Text,
        }
    }

    /// Short widget name, as used in schema files
    pub fn widget_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Date => "date",
            FieldKind::TriStateBoolean => "boolean",
            FieldKind::Enumerated(_) => "select",
        }
    }
}

/// The `value` slot of a schema entry
///
/// Only rendered into the prompt; the model overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    /// Instruction text telling the model how to fill the field
    Instruction(String),
    /// A literal default (e.g. `0`)
    Literal(Value),
}

impl EntryValue {
    /// JSON form used in the prompt
    pub fn to_json(&self) -> Value {
        match self {
            EntryValue::Instruction(text) => Value::String(text.clone()),
            EntryValue::Literal(value) => value.clone(),
        }
    }
}

/// One field descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    /// Field name, also the key in the model's response
    pub name: String,
    /// What the field means
    pub description: String,
    /// Declared type label (free-form, not enforced)
    pub type_label: String,
    /// Permitted literals; `None` stands for JSON null
    pub accepted_values: Vec<Option<String>>,
    /// Placeholder rendered into the prompt
    pub value: EntryValue,
    /// Editing kind for the review form
    pub kind: FieldKind,
}

impl SchemaEntry {
    /// Create an entry whose value slot is an instruction
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        type_label: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        let type_label = type_label.into();
        Self {
            name: name.into(),
            description: description.into(),
            kind: FieldKind::infer(&type_label, &[]),
            type_label,
            accepted_values: Vec::new(),
            value: EntryValue::Instruction(instruction.into()),
        }
    }

    /// Replace the value slot with a literal
    pub fn with_literal(mut self, literal: Value) -> Self {
        self.value = EntryValue::Literal(literal);
        self
    }

    /// Set accepted values (`None` = null) and re-derive the kind
    pub fn accepting(mut self, values: &[Option<&str>]) -> Self {
        self.accepted_values = values.iter().map(|v| v.map(str::to_string)).collect();
        self.kind = FieldKind::infer(&self.type_label, &self.accepted_values);
        self
    }
}

/// An ordered, named set of schema entries
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    entries: Vec<SchemaEntry>,
}

/// On-disk shape of one field in a schema file
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    description: String,
    #[serde(rename = "type", default)]
    type_label: String,
    #[serde(default)]
    accepted_values: Vec<Option<String>>,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    widget: Option<String>,
    #[serde(default)]
    min: Option<i64>,
}

impl Schema {
    /// Build a schema from entries
    pub fn new(name: impl Into<String>, entries: Vec<SchemaEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// One of the built-in field sets
    pub fn builtin(version: SchemaVersion) -> Self {
        match version {
            SchemaVersion::Batch => crate::builtin::batch_schema(),
            SchemaVersion::Review => crate::builtin::review_schema(),
        }
    }

    /// Load a schema from a JSON object of `field -> descriptor`
    ///
    /// Descriptors use the same keys the prompt shows the model
    /// (`description`, `type`, `accepted_values`, `value`) plus an optional
    /// `widget` (`text`, `number`, `date`, `boolean`, `select`) and `min`.
    pub fn from_json_str(name: impl Into<String>, json: &str) -> Result<Self, SchemaError> {
        let name = name.into();
        let raw: indexmap::IndexMap<String, RawEntry> = serde_json::from_str(json)?;
        if raw.is_empty() {
            return Err(SchemaError::Empty(name));
        }

        let mut entries = Vec::with_capacity(raw.len());
        for (field, entry) in raw {
            let kind = match entry.widget.as_deref() {
                None => FieldKind::infer(&entry.type_label, &entry.accepted_values),
                Some("text") => FieldKind::Text,
                Some("number") => FieldKind::Number {
                    min: entry.min.unwrap_or(0),
                },
                Some("date") => FieldKind::Date,
                Some("boolean") => FieldKind::TriStateBoolean,
                Some("select") => {
                    let options: Vec<String> =
                        entry.accepted_values.iter().flatten().cloned().collect();
                    if options.is_empty() {
                        return Err(SchemaError::EmptySelect(field));
                    }
                    FieldKind::Enumerated(options)
                }
                Some(other) => {
                    return Err(SchemaError::UnknownWidget {
                        field,
                        widget: other.to_string(),
                    })
                }
            };

            let value = match entry.value {
                Value::String(text) => EntryValue::Instruction(text),
                literal => EntryValue::Literal(literal),
            };

            entries.push(SchemaEntry {
                name: field,
                description: entry.description,
                type_label: entry.type_label,
                accepted_values: entry.accepted_values,
                value,
                kind,
            });
        }

        Ok(Self { name, entries })
    }

    /// Schema name (built-in version name or file stem)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Look up an entry by field name
    pub fn entry(&self, field: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.name == field)
    }

    /// Editing kind for a field; unknown fields edit as text
    pub fn kind_of(&self, field: &str) -> FieldKind {
        self.entry(field)
            .map(|e| e.kind.clone())
            .unwrap_or(FieldKind::Text)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_inference() {
        assert_eq!(FieldKind::infer("Integer", &[]), FieldKind::Number { min: 0 });
        assert_eq!(FieldKind::infer("$ Integer", &[]), FieldKind::Number { min: 0 });
        assert_eq!(FieldKind::infer("MM/DD/YYYY", &[]), FieldKind::Date);
        assert_eq!(FieldKind::infer("Boolean", &[]), FieldKind::TriStateBoolean);
        assert_eq!(FieldKind::infer("MM/DD/YYYY or String", &[]), FieldKind::Text);
        assert_eq!(FieldKind::infer("Integer or Boolean", &[]), FieldKind::Text);
        assert_eq!(
            FieldKind::infer("String", &[Some("all".into()), None]),
            FieldKind::Enumerated(vec!["all".into()])
        );
    }

    #[test]
    fn test_entry_builder() {
        let entry = SchemaEntry::new("Eligibility", "who is in", "String", "Extract value or null")
            .accepting(&[Some("all"), Some("only_insured")]);
        assert_eq!(entry.accepted_values.len(), 2);
        assert_eq!(
            entry.kind,
            FieldKind::Enumerated(vec!["all".into(), "only_insured".into()])
        );

        let entry = SchemaEntry::new("Lore users", "count", "Integer", "").with_literal(json!(0));
        assert_eq!(entry.value.to_json(), json!(0));
    }

    #[test]
    fn test_from_json_str_preserves_order_and_widgets() {
        let json = r#"{
            "Zulu": {"description": "z", "type": "String", "value": "Extract"},
            "Alpha": {"description": "a", "type": "Integer", "value": 0, "widget": "number", "min": 5},
            "Mike": {"description": "m", "type": "String", "accepted_values": ["x", null], "value": "pick"}
        }"#;

        let schema = Schema::from_json_str("custom", json).unwrap();
        assert_eq!(schema.name(), "custom");
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
        assert_eq!(schema.kind_of("Alpha"), FieldKind::Number { min: 5 });
        assert_eq!(schema.entry("Alpha").unwrap().value, EntryValue::Literal(json!(0)));
        assert_eq!(schema.kind_of("Mike"), FieldKind::Enumerated(vec!["x".into()]));
        assert_eq!(schema.kind_of("Unknown"), FieldKind::Text);
    }

    #[test]
    fn test_from_json_str_rejects_bad_definitions() {
        assert!(matches!(
            Schema::from_json_str("e", "{}"),
            Err(SchemaError::Empty(_))
        ));
        assert!(matches!(
            Schema::from_json_str("w", r#"{"A": {"widget": "slider"}}"#),
            Err(SchemaError::UnknownWidget { .. })
        ));
        assert!(matches!(
            Schema::from_json_str("s", r#"{"A": {"widget": "select"}}"#),
            Err(SchemaError::EmptySelect(_))
        ));
        assert!(matches!(
            Schema::from_json_str("j", "[1, 2]"),
            Err(SchemaError::Json(_))
        ));
    }
}
