//! Validates the JSON diagnostics of every error category against the
//! schema at schema/diagnostic-schema.json.

use std::path::Path;

use bdn_core::{ordinal, parse_document, Error};

fn validator() -> jsonschema::Validator {
    let schema_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schema/diagnostic-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

/// Documents that each fail in a different place of the grammar.
const MALFORMED: &[&str] = &[
    "",
    "1 2",
    "[1, 2",
    "[$a: 1, $b]",
    "[1..]",
    "[1..\"z\"]",
    "[$a: 1, $a: 2]",
    "5($a: 1",
    "5($a: 1, $a: 2)",
    "<2023-02-29>",
    "{break}",
    "{$x := risky() on $e}",
    "{select $x}",
    "{checkout $x at level 2}",
    "{$x := }",
    "{a.b}",
    "`",
];

#[test]
fn validate_diagnostics_of_malformed_documents_against_schema() {
    let validator = validator();
    let mut failures = Vec::new();
    let mut kinds = Vec::new();

    for source in MALFORMED {
        let error = match parse_document(source) {
            Ok(component) => panic!("{:?} parsed as {:?}", source, component),
            Err(error) => error,
        };
        let diagnostic = error.to_json_value();
        if let Err(e) = validator.validate(&diagnostic) {
            failures.push(format!("{:?}: {}\n{}", source, e, diagnostic));
        }
        kinds.push(error.kind());
    }

    assert!(
        failures.is_empty(),
        "Schema validation failed for {} of {} diagnostics:\n{}",
        failures.len(),
        MALFORMED.len(),
        failures.join("\n")
    );
    for kind in ["scan", "grammar", "semantic", "codec"] {
        assert!(kinds.contains(&kind), "no {} diagnostic in the corpus", kind);
    }
}

#[test]
fn validate_index_diagnostic_against_schema() {
    let error = Error::from(ordinal::normalize(0, 3).unwrap_err());
    let diagnostic = error.to_json_value();
    assert_eq!(diagnostic["kind"], "index");
    assert!(validator().validate(&diagnostic).is_ok(), "{}", diagnostic);
}

#[test]
fn schema_rejects_incomplete_diagnostics() {
    let incomplete = serde_json::json!({ "kind": "grammar", "message": "missing fields" });
    assert!(validator().validate(&incomplete).is_err());
}
