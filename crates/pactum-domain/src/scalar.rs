//! Scalar values and the flattened extraction result

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single extracted field value
///
/// The model is asked for strings, integers, booleans or null. Anything else
/// it sends back (floats, arrays, objects) is kept verbatim so callers can
/// decide what to do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON null, i.e. the field is unset
    Null,
    /// A boolean policy flag
    Bool(bool),
    /// An integral number
    Integer(i64),
    /// A non-integral number
    Float(f64),
    /// Free text, dates and categorical values
    Text(String),
    /// Arrays, objects and integers too large for `i64`
    Compound(Value),
}

impl Scalar {
    /// Convert a decoded JSON value into a scalar
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.is_f64()) {
                (Some(i), _) => Scalar::Integer(i),
                (None, true) => n.as_f64().map(Scalar::Float).unwrap_or(Scalar::Compound(Value::Number(n))),
                // Integers past i64 stay exact rather than rounding through f64
                (None, false) => Scalar::Compound(Value::Number(n)),
            },
            Value::String(s) => Scalar::Text(s),
            other => Scalar::Compound(other),
        }
    }

    /// Convert back into a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Integer(i) => Value::from(*i),
            Scalar::Float(f) => Value::from(*f),
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Compound(v) => v.clone(),
        }
    }

    /// True when the value is one of the shapes the schema asks for
    pub fn is_plain(&self) -> bool {
        !matches!(self, Scalar::Compound(_))
    }

    /// Name of the JSON type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "number",
            Scalar::Text(_) => "string",
            Scalar::Compound(Value::Array(_)) => "array",
            Scalar::Compound(Value::Object(_)) => "object",
            Scalar::Compound(Value::Number(_)) => "oversized integer",
            Scalar::Compound(_) => "value",
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Null
    }
}

impl fmt::Display for Scalar {
    /// Cell rendering: null is empty, text is unquoted, the rest is JSON
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Compound(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// Flattened field name -> value mapping for one contract
///
/// Iteration order is the order fields were inserted, which the parser keeps
/// identical to the order in the model's response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    fields: IndexMap<String, Scalar>,
}

impl ExtractionResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping its original position on replace
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Option<Scalar> {
        self.fields.insert(field.into(), value.into())
    }

    /// Look up a field
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields.get(field)
    }

    /// Mutable lookup
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Scalar> {
        self.fields.get_mut(field)
    }

    /// Whether the field is present (even if null)
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields were extracted
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// (field, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as a JSON object, preserving order
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Scalar)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ExtractionResult {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = indexmap::map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_shapes() {
        assert_eq!(Scalar::from_json(json!(null)), Scalar::Null);
        assert_eq!(Scalar::from_json(json!(true)), Scalar::Bool(true));
        assert_eq!(Scalar::from_json(json!(42)), Scalar::Integer(42));
        assert_eq!(Scalar::from_json(json!(2.5)), Scalar::Float(2.5));
        assert_eq!(Scalar::from_json(json!("all")), Scalar::Text("all".into()));
        assert_eq!(
            Scalar::from_json(json!(["a", "b"])),
            Scalar::Compound(json!(["a", "b"]))
        );
    }

    #[test]
    fn test_integer_past_i64_stays_exact() {
        let scalar = Scalar::from_json(json!(u64::MAX));
        assert_eq!(scalar, Scalar::Compound(json!(u64::MAX)));
        assert!(!scalar.is_plain());
        assert_eq!(scalar.type_name(), "oversized integer");
        assert_eq!(scalar.to_string(), "18446744073709551615");
        assert_eq!(scalar.to_json(), json!(18446744073709551615u64));
    }

    #[test]
    fn test_display_for_cells() {
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::Integer(90).to_string(), "90");
        assert_eq!(Scalar::from("Acme, Inc.").to_string(), "Acme, Inc.");
    }

    #[test]
    fn test_result_preserves_insertion_order() {
        let mut result = ExtractionResult::new();
        result.insert("Zeta", 1);
        result.insert("Alpha", "a");
        result.insert("Mid", Scalar::Null);

        let keys: Vec<_> = result.keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);

        // Replacing keeps the slot
        result.insert("Zeta", 2);
        assert_eq!(result.keys().next(), Some("Zeta"));
        assert_eq!(result.get("Zeta"), Some(&Scalar::Integer(2)));
    }

    #[test]
    fn test_result_serializes_as_flat_object() {
        let mut result = ExtractionResult::new();
        result.insert("Partner Name", "Acme");
        result.insert("Eligible users", 1200);
        result.insert("Community Access", Scalar::Null);

        let text = serde_json::to_string(&result).unwrap();
        assert_eq!(
            text,
            r#"{"Partner Name":"Acme","Eligible users":1200,"Community Access":null}"#
        );
        assert_eq!(result.to_json(), serde_json::from_str::<Value>(&text).unwrap());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Scalar::Integer(1).type_name(), "integer");
        assert_eq!(Scalar::Compound(json!({})).type_name(), "object");
        assert!(!Scalar::Compound(json!([])).is_plain());
    }
}
