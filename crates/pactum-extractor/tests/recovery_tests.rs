//! Integration tests for response recovery
//!
//! These tests drive the public parser API with the reply shapes the model
//! produces in practice: bare JSON, fenced JSON and JSON wrapped in prose.

use pactum_domain::{ExtractionResult, Scalar};
use pactum_extractor::{parse_response, parse_response_detailed, ParseError};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn reply_for(fields: &[(String, Value)]) -> String {
    let mut object = Map::new();
    for (name, value) in fields {
        object.insert(name.clone(), json!({ "type": "String", "value": value }));
    }
    serde_json::to_string_pretty(&Value::Object(object)).unwrap()
}

fn field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ./$]{0,24}".prop_map(Value::String),
    ]
}

fn fields() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::btree_map("[A-Z][a-z]{2,10}( [a-z]{2,8})?", field_value(), 1..8)
        .prop_map(|m| m.into_iter().collect())
}

#[test]
fn test_batch_style_reply() {
    let reply = r#"```json
{
  "Partner Name": {"description": "Subscriber", "type": "String", "value": "Acme"},
  "Active Lore User Pricing/month": {"type": "$ Integer", "value": 12},
  "Community Access": {"type": "Boolean", "value": false},
  "Trial period": {"type": "String", "value": null}
}
```"#;

    let result = parse_response(reply).unwrap();
    let mut expected = ExtractionResult::new();
    expected.insert("Partner Name", "Acme");
    expected.insert("Active Lore User Pricing/month", 12);
    expected.insert("Community Access", false);
    expected.insert("Trial period", Scalar::Null);
    assert_eq!(result, expected);
}

#[test]
fn test_error_kinds() {
    assert_eq!(parse_response(""), Err(ParseError::EmptyResponse));
    assert_eq!(
        parse_response("The contract has no relevant terms."),
        Err(ParseError::NoJsonFound)
    );
    assert!(matches!(
        parse_response("{\"Partner Name\": {\"value\": \"Acme\",}}"),
        Err(ParseError::Decode { .. })
    ));
}

#[test]
fn test_unicode_survives() {
    let result = parse_response(r#"{"Partner Name": {"value": "Société Générale, Zürich"}}"#).unwrap();
    assert_eq!(
        result.get("Partner Name"),
        Some(&Scalar::Text("Société Générale, Zürich".into()))
    );
}

proptest! {
    #[test]
    fn prop_fenced_bare_and_wrapped_agree(fields in fields(), lead in "[a-zA-Z .,:]{0,40}", tail in "[a-zA-Z .,:]{0,40}") {
        let reply = reply_for(&fields);

        let bare = parse_response(&reply).unwrap();
        let fenced = parse_response(&format!("{}\n```json\n{}\n```\n{}", lead, reply, tail)).unwrap();
        let wrapped = parse_response(&format!("{}\n{}\n{}", lead, reply, tail)).unwrap();

        prop_assert_eq!(&bare, &fenced);
        prop_assert_eq!(&bare, &wrapped);
    }

    #[test]
    fn prop_values_and_order_are_kept(fields in fields()) {
        let parsed = parse_response_detailed(&reply_for(&fields)).unwrap();
        prop_assert!(parsed.anomalies.is_empty());

        let names: Vec<&str> = parsed.result.keys().collect();
        let expected: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        prop_assert_eq!(names, expected);

        for (name, value) in &fields {
            prop_assert_eq!(parsed.result.get(name), Some(&Scalar::from_json(value.clone())));
        }
    }
}
