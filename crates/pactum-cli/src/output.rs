//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::form::{FormState, NOT_SPECIFIED};
use colored::*;
use pactum_domain::{ExtractionResult, FieldKind, Scalar, Schema};
use pactum_extractor::FieldAnomaly;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extraction result.
    pub fn format_result(&self, result: &ExtractionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => Ok(self.format_result_table(result)),
            OutputFormat::Quiet => Ok(result
                .iter()
                .map(|(_, value)| value.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_result_table(&self, result: &ExtractionResult) -> String {
        if result.is_empty() {
            return self.colorize("No fields extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (field, value) in result {
            builder.push_record([field.as_str(), display_value(value).as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format the review form with numbered rows and change markers.
    pub fn format_form(&self, form: &FormState, schema: &Schema) -> String {
        let changed = form.changed_fields();

        let mut builder = Builder::default();
        builder.push_record(["#", "Field", "Input", "Value", ""]);
        for (index, (field, value)) in form.edited.iter().enumerate() {
            let kind = schema.kind_of(field);
            let marker = if changed.contains(&field) { "*" } else { "" };
            builder.push_record([
                (index + 1).to_string(),
                field.to_string(),
                kind_label(&kind),
                display_value(value),
                marker.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format the fields of a schema.
    pub fn format_schema(&self, schema: &Schema) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let fields: Vec<serde_json::Value> = schema
                    .entries()
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "name": e.name,
                            "description": e.description,
                            "type": e.type_label,
                            "widget": e.kind.widget_name(),
                            "accepted_values": e.accepted_values,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&fields)?)
            }
            OutputFormat::Quiet => Ok(schema.field_names().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["#", "Field", "Type", "Input", "Description"]);
                for (index, entry) in schema.entries().iter().enumerate() {
                    builder.push_record([
                        (index + 1).to_string(),
                        entry.name.clone(),
                        entry.type_label.clone(),
                        kind_label(&entry.kind),
                        entry.description.clone(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(format!(
                    "{}\n{}",
                    self.info(&format!("Schema '{}' ({} fields)", schema.name(), schema.len())),
                    table
                ))
            }
        }
    }

    /// Format parser anomalies as warnings, one per line.
    pub fn format_anomalies(&self, anomalies: &[FieldAnomaly]) -> String {
        anomalies
            .iter()
            .map(|a| self.warning(&a.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format a section banner around echoed output.
    pub fn section(&self, title: &str) -> String {
        self.colorize(&format!("--- {} ---", title), "cyan")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Cell text for a value; null shows as "Not Specified".
fn display_value(value: &Scalar) -> String {
    match value {
        Scalar::Null => NOT_SPECIFIED.to_string(),
        other => other.to_string(),
    }
}

fn kind_label(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Number { min } => format!("number (>= {})", min),
        FieldKind::Enumerated(options) => format!("select: {}", options.join(" | ")),
        other => other.widget_name().to_string(),
    }
}
