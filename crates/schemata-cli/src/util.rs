use std::fs;
use std::io::{self, Read};

use anyhow::Context as _;
use serde_json::Value;

/// Read input from file path or stdin.
/// - `"-"` reads from stdin
/// - anything else is a file path
pub fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Error reading from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("Error reading file: {path}"))
}

/// Read and parse a JSON document.
pub fn read_json(path: &str) -> anyhow::Result<Value> {
    let contents = read_input(path)?;
    serde_json::from_str(&contents).with_context(|| format!("Error parsing JSON: {}", display_path(path)))
}

/// Helper to get display path for error messages
pub fn display_path(path: &str) -> &str {
    if path == "-" { "<stdin>" } else { path }
}
