use std::io::Write;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::NamedTempFile;

fn json_file(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn schemata(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemata"))
        .args(args)
        .output()
        .unwrap()
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

fn node_schema() -> Value {
    json!({
        "definitions": {
            "Node": {
                "type": "object",
                "properties": {
                    "value": { "type": "integer" },
                    "child": { "$ref": "Node" },
                },
            },
        },
        "$ref": "Node",
    })
}

#[test]
fn test_check_valid_value() {
    let schema = json_file(&node_schema());
    let value = json_file(&json!({ "value": 1, "child": { "value": 2 } }));

    let output = schemata(&["check", path(&value), "--schema", path(&schema)]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn test_check_invalid_value_prints_error_tree() {
    let schema = json_file(&node_schema());
    let value = json_file(&json!({ "child": { "value": "2" } }));

    let output = schemata(&["check", path(&value), "--schema", path(&schema)]);
    assert_eq!(output.status.code(), Some(1));

    let errors: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        errors,
        json!({
            "child": {
                "value": {
                    "type": ["Got value of type 'string'. Value must be of type(s): integer."],
                },
            },
        })
    );
}

#[test]
fn test_check_separate_definitions_file() {
    let definitions = json_file(&json!({ "Port": { "type": "integer", "maximum": 65535 } }));
    let schema = json_file(&json!({ "properties": { "port": { "$ref": "Port" } } }));
    let value = json_file(&json!({ "port": 70000 }));

    let output = schemata(&[
        "check",
        path(&value),
        "--schema",
        path(&schema),
        "--definitions",
        path(&definitions),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let errors: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(errors.pointer("/port/maximum/0").is_some());
}

#[test]
fn test_check_undefined_reference_fails_construction() {
    let schema = json_file(&json!({ "$ref": "Missing" }));
    let value = json_file(&json!({}));

    let output = schemata(&["check", path(&value), "--schema", path(&schema)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("undefined reference: Missing"));
}

#[test]
fn test_check_missing_value_file() {
    let schema = json_file(&json!({ "type": "string" }));
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    let output = schemata(&["check", missing.to_str().unwrap(), "--schema", path(&schema)]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_check_depth_limit() {
    let schema = json_file(&json!({
        "definitions": { "List": { "type": "array", "items": "List" } },
        "$ref": "List",
    }));
    let value = json_file(&json!([[[[[[[[[[]]]]]]]]]]));

    let output = schemata(&[
        "check",
        path(&value),
        "--schema",
        path(&schema),
        "--max-depth",
        "4",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("maximum validation depth of 4 exceeded"));
}

#[test]
fn test_check_error_order_follows_schema_document() {
    let schema = json_file(&json!({
        "definitions": {},
        "minLength": 5,
        "pattern": "^a",
        "enum": ["x"],
    }));
    let value = json_file(&json!("b"));

    let output = schemata(&["check", path(&value), "--schema", path(&schema)]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let position = |key: &str| stdout.find(&format!("\"{key}\"")).unwrap();
    assert!(position("minLength") < position("pattern"));
    assert!(position("pattern") < position("enum"));
}
