//! Built-in field sets

use serde_json::json;

use crate::schema::{Schema, SchemaEntry};
use crate::version::SchemaVersion;

const DATE_INSTRUCTION: &str = "Find the date in the contract (e.g., 'Month DD, YYYY', 'MM/DD/YYYY', etc.) and convert it to MM/DD/YYYY format. Use null if not found.";

/// Fields shared by both versions, in the order both declare them
fn leading_entries() -> Vec<SchemaEntry> {
    vec![
        SchemaEntry::new(
            "Partner Name",
            "The name of the partner per the contract denoted as 'Subscriber'",
            "String",
            "Extract from contract",
        ),
        SchemaEntry::new(
            "Effective date",
            "The effective date of the contract",
            "MM/DD/YYYY",
            DATE_INSTRUCTION,
        ),
        SchemaEntry::new(
            "Term length (days)",
            "The length of the contract in days",
            "Integer",
            "Calculate or extract integer, null if not specified",
        ),
        SchemaEntry::new(
            "Termination date",
            "The end date of the contract",
            "MM/DD/YYYY",
            DATE_INSTRUCTION,
        ),
    ]
}

fn pricing_and_user_entries() -> Vec<SchemaEntry> {
    vec![
        SchemaEntry::new(
            "Active Lore User Pricing/month",
            "The price Lore is charging per user, per month",
            "$ Integer",
            "Extract integer value, null if not specified",
        ),
        SchemaEntry::new("Eligible users", "Number of eligible users", "Integer", "")
            .with_literal(json!(0)),
        SchemaEntry::new("Lore users", "Number of Lore users", "Integer", "").with_literal(json!(0)),
        SchemaEntry::new("Total Monthly Active Users", "Total MAU", "Integer", "")
            .with_literal(json!(0)),
        SchemaEntry::new(
            "Community Access",
            "Whether the signing Partner will provide access to the Lore community",
            "Boolean",
            "Extract True/False, null if not specified",
        ),
    ]
}

fn dependents_entry() -> SchemaEntry {
    SchemaEntry::new(
        "Dependents allowed",
        "Are dependents included in the list of eligible users?",
        "Boolean",
        "Extract True/False, null if not specified",
    )
}

fn eligibility_entry() -> SchemaEntry {
    SchemaEntry::new(
        "Eligibility",
        "Whether all employees are included or only those on insurance ('all' or 'only_insured')",
        "String",
        "Extract value or null",
    )
    .accepting(&[Some("all"), Some("only_insured")])
}

/// The batch pipeline's field set
pub(crate) fn batch_schema() -> Schema {
    let mut entries = leading_entries();
    entries.extend(pricing_and_user_entries());
    entries.extend([
        SchemaEntry::new(
            "Data deletion policy (lorebot)",
            "Does the contract explicitly stipulate a requirement for Lore to routinely delete user personal data upon request or after a certain period? This must be a specific term. Set to True only if this specific policy is mentioned, otherwise False.",
            "Boolean",
            "Extract True/False",
        ),
        SchemaEntry::new(
            "Timeframe (hours)",
            "If 'Data deletion policy (lorebot)' is True, extract the timeframe (in hours) within which data must be deleted. Use null if no timeframe is specified.",
            "Integer",
            "Extract integer, null if no policy or not specified",
        ),
        dependents_entry(),
        eligibility_entry(),
        SchemaEntry::new(
            "Reconciliation Start Date",
            "Calculate and provide the estimated start date for financial reconciliation based on other contract dates and terms (e.g., 'Effective Date' + 'Term Length'). If it's a condition, state the condition (e.g., 'After 12 months of Phase 2'). Use null if not mentioned.",
            "MM/DD/YYYY or String",
            "Calculate or extract condition, null if not applicable",
        ),
        SchemaEntry::new(
            "Reconciliation entity and cost",
            "The entity responsible for reconciliation and any associated costs, if specified. This may be TBD. Use null if not mentioned or if no reconciliation.",
            "String",
            "Extract entity and cost details or TBD, null if not applicable",
        ),
        SchemaEntry::new(
            "Population of eligible users",
            "Categorize the eligible user population based on the contract description.",
            "String",
            "Categorize and select one value from accepted_values",
        )
        .accepting(&[
            Some("Employees Only"),
            Some("Employees and Dependents"),
            Some("Medicare"),
            Some("Medicare Advantage"),
            Some("Other"),
        ]),
        SchemaEntry::new(
            "Limit on number of users",
            "The maximum number of users for the main contract term (ignore any limits specific only to a trial period). Use 0 if no limit is explicitly stated for the full agreement.",
            "Integer",
            "Extract number, or 0 if unlimited/not specified",
        ),
        SchemaEntry::new(
            "Data sharing agreement or business associate agreement",
            "Specify if a 'Data sharing agreement' or 'Business associate agreement' (BAA) is mentioned. Should be one or the other if applicable, not both. Use null if neither is mentioned.",
            "String",
            "Extract agreement type, or null",
        )
        .accepting(&[
            Some("Data sharing agreement"),
            Some("Business associate agreement"),
            None,
        ]),
        SchemaEntry::new(
            "Performance Reports Frequency",
            "The frequency of performance reports provided to the partner (e.g., monthly, quarterly).",
            "String",
            "Extract frequency (e.g., monthly), null if not specified",
        ),
        SchemaEntry::new(
            "Users permitted to convert Lore points to money",
            "Can users convert points to money (e.g., gift cards)? Set to True or False.",
            "Boolean",
            "Extract True/False, null if not specified",
        ),
        SchemaEntry::new(
            "Trial period",
            "If a trial period is offered, extract its duration in days as an integer (e.g., 90). If no trial period is mentioned, use the boolean value false.",
            "Integer or Boolean",
            "Extract integer days, or the boolean value false if not specified",
        ),
    ]);

    Schema::new(SchemaVersion::Batch.as_str(), entries)
}

/// The interactive review form's field set
pub(crate) fn review_schema() -> Schema {
    let mut entries = leading_entries();
    entries.push(SchemaEntry::new(
        "Reconciliation start date",
        "The start date for reconciling Lore's pricing model.",
        "MM/DD/YYYY",
        "First, look for an explicitly stated Reconciliation Start Date and convert it to MM/DD/YYYY format. If not found, perform the following calculation: 1. Find the Effective Date. 2. Add 12 months to the Effective Date (end of Benchmark Period). 3. Add 4 months to the result from step 2. 4. Format this final calculated date as MM/DD/YYYY. If the Effective Date cannot be found for calculation, return null.",
    ));
    entries.extend(pricing_and_user_entries());
    entries.extend([
        SchemaEntry::new(
            "Data deletion policy (lorebot)",
            "Whether a data deletion policy is specifically stipulated",
            "Boolean",
            "Extract True/False, null if not specified",
        ),
        SchemaEntry::new(
            "Timeframe (hours)",
            "Timeframe in hours for Lore to delete personal data per policy",
            "Integer",
            "Extract integer, null if no policy or not specified",
        ),
        SchemaEntry::new(
            "Data covered by HIPAA",
            "Contingent upon whether there is a business associate agreement",
            "Boolean",
            "Determine True/False based on BAA presence, null if unclear",
        ),
        SchemaEntry::new(
            "Business Associate Agreement",
            "Required by health plan/self-funded employer if covered entity under HIPAA",
            "Boolean",
            "Extract True/False, null if not mentioned",
        ),
        SchemaEntry::new(
            "Data Sharing Agreement",
            "An agreement to share HIPAA data",
            "Boolean",
            "Extract True/False, null if not mentioned",
        ),
        SchemaEntry::new(
            "Reconciliation Method",
            "Method for reconciling payments (monthly_Fee or reconciliation_statement)",
            "String",
            "Extract value or null",
        )
        .accepting(&[Some("monthly_Fee"), Some("reconciliation_statement")]),
        dependents_entry(),
        eligibility_entry(),
    ]);

    Schema::new(SchemaVersion::Review.as_str(), entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EntryValue, FieldKind};
    use std::collections::HashSet;

    #[test]
    fn test_batch_schema_shape() {
        let schema = batch_schema();
        assert_eq!(schema.name(), "batch");
        assert_eq!(schema.len(), 21);
        assert_eq!(schema.entries()[0].name, "Partner Name");
        assert_eq!(schema.entries()[20].name, "Trial period");
        assert_eq!(schema.kind_of("Trial period"), FieldKind::Text);
        assert_eq!(schema.kind_of("Reconciliation Start Date"), FieldKind::Text);
    }

    #[test]
    fn test_review_schema_shape() {
        let schema = review_schema();
        assert_eq!(schema.name(), "review");
        assert_eq!(schema.len(), 18);
        assert_eq!(schema.kind_of("Reconciliation start date"), FieldKind::Date);
        assert_eq!(
            schema.kind_of("Reconciliation Method"),
            FieldKind::Enumerated(vec!["monthly_Fee".into(), "reconciliation_statement".into()])
        );
        assert_eq!(schema.kind_of("Data covered by HIPAA"), FieldKind::TriStateBoolean);
        assert_eq!(
            schema.kind_of("Active Lore User Pricing/month"),
            FieldKind::Number { min: 0 }
        );
    }

    #[test]
    fn test_field_names_are_unique() {
        for schema in [batch_schema(), review_schema()] {
            let names: HashSet<_> = schema.field_names().collect();
            assert_eq!(names.len(), schema.len(), "duplicate field in {}", schema.name());
        }
    }

    #[test]
    fn test_user_counts_are_literal_zero() {
        let schema = batch_schema();
        let entry = schema.entry("Eligible users").unwrap();
        assert_eq!(entry.value, EntryValue::Literal(json!(0)));
    }

    #[test]
    fn test_agreement_type_allows_null() {
        let schema = batch_schema();
        let entry = schema
            .entry("Data sharing agreement or business associate agreement")
            .unwrap();
        assert_eq!(entry.accepted_values.last(), Some(&None));
    }
}
