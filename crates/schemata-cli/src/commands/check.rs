//! Check command - validates a JSON value against a schema.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use schemata::{Builder, Context, Error, ValidateConfig, Validator, keywords};
use tracing::{debug, info};

use super::{Outcome, report};
use crate::util::{display_path, read_json};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the JSON value to validate ("-" for stdin)
    pub file: String,

    /// Path to the JSON schema document
    #[arg(short, long)]
    pub schema: String,

    /// Path to a JSON object of named definitions.
    /// Defaults to the schema document's own `definitions`.
    #[arg(short, long)]
    pub definitions: Option<String>,

    /// Maximum nesting depth before validation is aborted
    #[arg(long, default_value_t = ValidateConfig::default().max_depth)]
    pub max_depth: usize,
}

pub fn run(args: Args) -> ExitCode {
    report(check(&args))
}

/// Load, construct and validate. Errors are loading or construction failures;
/// a value that fails validation is an `Ok(Outcome::Invalid)`.
pub fn check(args: &Args) -> anyhow::Result<Outcome> {
    let document = read_json(&args.schema)?;
    let context = match &args.definitions {
        Some(path) => Context::from_definitions(&read_json(path)?)
            .with_context(|| format!("Invalid definitions: {}", display_path(path)))?,
        None => Context::from_document(&document)
            .with_context(|| format!("Invalid schema: {}", display_path(&args.schema)))?,
    };
    debug!(definitions = context.definitions().len(), "loaded context");

    let mut schema = document
        .as_object()
        .cloned()
        .ok_or_else(|| anyhow!("Schema must be a JSON object: {}", display_path(&args.schema)))?;
    schema.shift_remove(keywords::DEFINITIONS);

    let mapping = Builder::new(Arc::new(context))
        .construct(&schema)
        .with_context(|| format!("Invalid schema: {}", display_path(&args.schema)))?;

    let value = read_json(&args.file)?;
    let validator = Validator::new(ValidateConfig {
        max_depth: args.max_depth,
    });
    match validator.validate(&value, &mapping) {
        Ok(()) => {
            info!(file = display_path(&args.file), "valid");
            Ok(Outcome::Valid)
        }
        Err(Error::Invalid(errors)) => {
            info!(
                file = display_path(&args.file),
                errors = errors.message_count(),
                "invalid"
            );
            Ok(Outcome::Invalid(serde_json::to_value(&errors)?))
        }
        Err(e) => Err(e).with_context(|| format!("Validation aborted: {}", display_path(&args.file))),
    }
}
