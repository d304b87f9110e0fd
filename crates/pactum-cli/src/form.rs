//! Review form state and per-kind value coercion.
//!
//! Each field is edited through the widget its [`FieldKind`] implies. Model
//! output is coerced once when the form is seeded; user input is validated on
//! every edit.

use crate::error::{CliError, Result};
use chrono::NaiveDate;
use pactum_domain::{ExtractionResult, FieldKind, Scalar, Schema};
use tracing::warn;

/// Display and storage format for dates.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Label for an unset tri-state or select field.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Parsed values and their edited copy.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Values as seeded from the extraction
    pub original: ExtractionResult,
    /// Values after user edits
    pub edited: ExtractionResult,
}

impl FormState {
    /// Start editing from seeded values.
    pub fn new(original: ExtractionResult) -> Self {
        Self {
            edited: original.clone(),
            original,
        }
    }

    /// Seed a form from an extraction, coercing each value to its widget.
    ///
    /// Returns the state plus one warning per value the widget could not hold.
    pub fn seed(schema: &Schema, parsed: &ExtractionResult) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let seeded = parsed
            .iter()
            .map(|(field, value)| {
                let kind = schema.kind_of(field);
                let (coerced, warning) = coerce_seed(&kind, value);
                if let Some(warning) = warning {
                    warn!("Field '{}': {}", field, warning);
                    warnings.push(format!("'{}': {}", field, warning));
                }
                (field.to_string(), coerced)
            })
            .collect();
        (Self::new(seeded), warnings)
    }

    /// Revert every edit.
    pub fn reset(&mut self) {
        self.edited = self.original.clone();
    }

    /// Field names whose edited value differs from the seeded one.
    pub fn changed_fields(&self) -> Vec<&str> {
        self.edited
            .iter()
            .filter(|(field, value)| self.original.get(field) != Some(*value))
            .map(|(field, _)| field)
            .collect()
    }

    /// True if any field was edited.
    pub fn is_modified(&self) -> bool {
        self.edited != self.original
    }

    /// Resolve a field by 1-based position or case-insensitive name.
    pub fn resolve_field(&self, selector: &str) -> Result<String> {
        let selector = selector.trim();
        if let Ok(index) = selector.parse::<usize>() {
            return self
                .edited
                .keys()
                .nth(index.wrapping_sub(1))
                .map(str::to_string)
                .ok_or_else(|| {
                    CliError::InvalidInput(format!(
                        "No field #{} (form has {} fields)",
                        index,
                        self.edited.len()
                    ))
                });
        }

        self.edited
            .keys()
            .find(|name| name.eq_ignore_ascii_case(selector))
            .map(str::to_string)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown field '{}'", selector)))
    }

    /// Set a field from user input.
    pub fn set(&mut self, schema: &Schema, field: &str, input: &str) -> Result<()> {
        let kind = schema.kind_of(field);
        let value = parse_input(&kind, input)
            .map_err(|msg| CliError::InvalidInput(format!("'{}': {}", field, msg)))?;
        self.edited.insert(field, value);
        Ok(())
    }

    /// Put a field back to its widget's empty state.
    pub fn clear(&mut self, schema: &Schema, field: &str) {
        let value = match schema.kind_of(field) {
            FieldKind::Text => Scalar::Text(String::new()),
            FieldKind::Number { min } => Scalar::Integer(min),
            FieldKind::Date | FieldKind::TriStateBoolean | FieldKind::Enumerated(_) => Scalar::Null,
        };
        self.edited.insert(field, value);
    }

    /// Live JSON view of the edited values.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.edited)?)
    }
}

/// Coerce a model value into what its widget can display.
fn coerce_seed(kind: &FieldKind, value: &Scalar) -> (Scalar, Option<String>) {
    match kind {
        FieldKind::Text => {
            let text = match value {
                Scalar::Null => String::new(),
                other => other.to_string(),
            };
            (Scalar::Text(text), None)
        }

        FieldKind::Number { min } => {
            let number = match value {
                Scalar::Null => return (Scalar::Integer(*min), None),
                Scalar::Integer(i) => Some(*i),
                Scalar::Float(f) if f.is_finite() => Some(f.trunc() as i64),
                Scalar::Text(s) => parse_number(s),
                _ => None,
            };
            match number {
                Some(n) => (Scalar::Integer(n), None),
                None => (
                    Scalar::Integer(*min),
                    Some(format!("could not convert {} to an integer, using {}", value, min)),
                ),
            }
        }

        FieldKind::Date => match value {
            Scalar::Null => (Scalar::Null, None),
            Scalar::Text(s) if s.trim().is_empty() => (Scalar::Null, None),
            other => match parse_date(&other.to_string()) {
                Some(date) => (Scalar::Text(date.format(DATE_FORMAT).to_string()), None),
                None => (
                    Scalar::Null,
                    Some(format!("could not parse date {}, please set it manually", other)),
                ),
            },
        },

        FieldKind::TriStateBoolean => {
            let flag = match value {
                Scalar::Bool(b) => Some(*b),
                Scalar::Text(s) => parse_bool(s),
                _ => None,
            };
            (flag.map(Scalar::Bool).unwrap_or(Scalar::Null), None)
        }

        FieldKind::Enumerated(options) => match value {
            Scalar::Text(s) if options.iter().any(|o| o == s) => (value.clone(), None),
            _ => (Scalar::Null, None),
        },
    }
}

/// Validate user input for a field kind.
fn parse_input(kind: &FieldKind, input: &str) -> std::result::Result<Scalar, String> {
    let input = input.trim();
    match kind {
        FieldKind::Text => Ok(Scalar::Text(input.to_string())),

        FieldKind::Number { min } => {
            let n = parse_number(input).ok_or_else(|| format!("'{}' is not an integer", input))?;
            if n < *min {
                return Err(format!("value must be at least {}", min));
            }
            Ok(Scalar::Integer(n))
        }

        FieldKind::Date => {
            if is_unset(input) {
                return Ok(Scalar::Null);
            }
            parse_date(input)
                .map(|d| Scalar::Text(d.format(DATE_FORMAT).to_string()))
                .ok_or_else(|| format!("'{}' is not a date (use MM/DD/YYYY)", input))
        }

        FieldKind::TriStateBoolean => {
            if is_unset(input) {
                return Ok(Scalar::Null);
            }
            parse_bool(input)
                .map(Scalar::Bool)
                .ok_or_else(|| format!("'{}' is not true, false or none", input))
        }

        FieldKind::Enumerated(options) => {
            if is_unset(input) {
                return Ok(Scalar::Null);
            }
            options
                .iter()
                .find(|o| o.as_str() == input)
                .map(|o| Scalar::Text(o.clone()))
                .ok_or_else(|| format!("'{}' is not one of: {}", input, options.join(", ")))
        }
    }
}

/// Integer parsing that tolerates a leading `$`.
fn parse_number(s: &str) -> Option<i64> {
    let s = s.trim();
    s.strip_prefix('$').unwrap_or(s).trim().parse().ok()
}

/// `MM/DD/YYYY`, or ISO `YYYY-MM-DD` with an optional trailing time.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok().or_else(|| {
        let date_part = s.split_whitespace().next()?;
        let date_part = date_part.split('T').next()?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn is_unset(input: &str) -> bool {
    input.is_empty()
        || input.eq_ignore_ascii_case("none")
        || input.eq_ignore_ascii_case("null")
        || input.eq_ignore_ascii_case(NOT_SPECIFIED)
}
