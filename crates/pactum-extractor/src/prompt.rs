//! LLM prompt engineering for field extraction

use pactum_domain::{Schema, SchemaEntry};
use serde_json::Value;

/// Marker placed on the line before the contract text
pub const CONTRACT_START: &str = "--- START CONTRACT ---";

/// Marker placed on the line after the contract text
pub const CONTRACT_END: &str = "--- END CONTRACT ---";

/// Builds prompts asking the LLM to fill a schema from contract text
pub struct PromptBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for a schema
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Build the complete extraction prompt
    ///
    /// The contract text is inserted verbatim; the markers only bound it
    /// visually for the model.
    pub fn build(&self, contract_text: &str) -> String {
        let mut prompt = String::new();

        // 1. Instruction preamble
        prompt.push('\n');
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nJSON Structure and Instructions:\n\n");

        // 2. Field descriptors
        prompt.push_str(&self.render_schema());
        prompt.push_str("\n\n");

        // 3. The contract
        prompt.push_str("Contract Text:\n");
        prompt.push_str(CONTRACT_START);
        prompt.push('\n');
        prompt.push_str(contract_text);
        prompt.push('\n');
        prompt.push_str(CONTRACT_END);
        prompt.push_str("\n\n");

        // 4. Output cue
        prompt.push_str(OUTPUT_CUE);

        prompt
    }

    /// Render the schema as the JSON object shown to the model
    pub fn render_schema(&self) -> String {
        let fields: Vec<String> = self.schema.entries().iter().map(render_entry).collect();
        format!("{{\n{}\n}}", fields.join(",\n"))
    }
}

/// Build a prompt for `contract_text` against `schema`
pub fn build_prompt(schema: &Schema, contract_text: &str) -> String {
    PromptBuilder::new(schema).build(contract_text)
}

fn json_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn render_entry(entry: &SchemaEntry) -> String {
    let mut lines = vec![
        format!("    \"description\": {}", json_string(&entry.description)),
        format!("    \"type\": {}", json_string(&entry.type_label)),
    ];

    if !entry.accepted_values.is_empty() {
        let values: Vec<String> = entry
            .accepted_values
            .iter()
            .map(|v| match v {
                Some(s) => json_string(s),
                None => "null".to_string(),
            })
            .collect();
        lines.push(format!("    \"accepted_values\": [{}]", values.join(", ")));
    }

    lines.push(format!("    \"value\": {}", entry.value.to_json()));

    format!(
        "  {}: {{\n{}\n  }}",
        json_string(&entry.name),
        lines.join(",\n")
    )
}

const EXTRACTION_INSTRUCTIONS: &str = "Parse the following contract text into a JSON object. Adhere strictly to the specified fields, data types, formats, and accepted categorical values. If information for a field is not found, use null where allowed, or follow the specific instructions for that field.

Return ONLY the JSON object, without any introductory text, explanations, or markdown formatting.";

const OUTPUT_CUE: &str = "JSON Output:\n";

#[cfg(test)]
mod tests {
    use super::*;
    use pactum_domain::SchemaVersion;
    use proptest::prelude::*;

    fn between<'p>(prompt: &'p str, start: &str, end: &str) -> &'p str {
        let from = prompt.find(start).unwrap() + start.len();
        let to = prompt[from..].find(end).unwrap() + from;
        &prompt[from..to]
    }

    #[test]
    fn test_prompt_includes_text_between_markers() {
        let schema = Schema::builtin(SchemaVersion::Batch);
        let prompt = build_prompt(&schema, "Subscriber: Acme Health Plan");
        assert!(prompt.contains(
            "--- START CONTRACT ---\nSubscriber: Acme Health Plan\n--- END CONTRACT ---"
        ));
        assert!(prompt.ends_with("JSON Output:\n"));
    }

    #[test]
    fn test_prompt_includes_instructions() {
        let schema = Schema::builtin(SchemaVersion::Review);
        let prompt = build_prompt(&schema, "text");
        assert!(prompt.contains("Return ONLY the JSON object"));
        assert!(prompt.contains("JSON Structure and Instructions:"));
        assert!(prompt.contains("\"Reconciliation Method\""));
    }

    #[test]
    fn test_schema_block_is_valid_json_in_declaration_order() {
        for version in SchemaVersion::ALL {
            let schema = Schema::builtin(version);
            let prompt = build_prompt(&schema, "text");
            let block = between(&prompt, "JSON Structure and Instructions:\n\n", "\n\nContract Text:");

            let parsed: serde_json::Map<String, Value> = serde_json::from_str(block).unwrap();
            let keys: Vec<_> = parsed.keys().map(String::as_str).collect();
            let expected: Vec<_> = schema.field_names().collect();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn test_entry_rendering() {
        let schema = Schema::builtin(SchemaVersion::Batch);
        let rendered = PromptBuilder::new(&schema).render_schema();

        assert!(rendered.contains(
            "  \"Eligibility\": {\n    \"description\": \"Whether all employees are included or only those on insurance ('all' or 'only_insured')\",\n    \"type\": \"String\",\n    \"accepted_values\": [\"all\", \"only_insured\"],\n    \"value\": \"Extract value or null\"\n  }"
        ));
        assert!(rendered.contains(
            "\"accepted_values\": [\"Data sharing agreement\", \"Business associate agreement\", null]"
        ));
        assert!(rendered.contains("  \"Lore users\": {\n    \"description\": \"Number of Lore users\",\n    \"type\": \"Integer\",\n    \"value\": 0\n  }"));
    }

    #[test]
    fn test_contract_text_is_not_escaped() {
        let schema = Schema::builtin(SchemaVersion::Batch);
        let text = "Fee: \"$12\" per {user}\n\ttabbed";
        let prompt = build_prompt(&schema, text);
        assert_eq!(between(&prompt, "--- START CONTRACT ---\n", "\n--- END CONTRACT ---"), text);
    }

    #[test]
    fn test_empty_text_still_renders() {
        let schema = Schema::builtin(SchemaVersion::Batch);
        let prompt = build_prompt(&schema, "");
        assert!(prompt.contains("--- START CONTRACT ---\n\n--- END CONTRACT ---"));
    }

    proptest! {
        #[test]
        fn prop_contract_text_round_trips(text in "[^-]{0,200}") {
            let schema = Schema::builtin(SchemaVersion::Batch);
            let prompt = build_prompt(&schema, &text);
            let expected = format!("{}\n{}\n{}", CONTRACT_START, text, CONTRACT_END);
            prop_assert!(prompt.contains(&expected));
        }

        #[test]
        fn prop_prompt_is_deterministic(text in ".{0,200}") {
            let schema = Schema::builtin(SchemaVersion::Review);
            prop_assert_eq!(build_prompt(&schema, &text), build_prompt(&schema, &text));
        }
    }
}
