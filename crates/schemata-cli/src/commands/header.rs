//! Header command - validates a raw header value against a header definition.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use schemata::{
    Builder, Context, Error, HeaderDefinition, HeaderType, Validator, construct_header_validators,
};
use serde_json::Value;
use tracing::info;

use super::{Outcome, report};
use crate::util::{display_path, read_json};

#[derive(clap::Args)]
pub struct Args {
    /// Raw header value as received. Omit to check a missing header.
    pub value: Option<String>,

    /// Path to the JSON header definition
    #[arg(short, long)]
    pub definition: String,
}

pub fn run(args: Args) -> ExitCode {
    report(check(&args))
}

/// Array headers are split by their collection format; every element, like
/// any other header value, stays a string.
fn header_value(definition: &HeaderDefinition, raw: &str) -> Value {
    match definition.kind {
        HeaderType::Array => Value::Array(
            definition
                .split(raw)
                .into_iter()
                .map(Value::from)
                .collect(),
        ),
        _ => Value::from(raw),
    }
}

pub fn check(args: &Args) -> anyhow::Result<Outcome> {
    let path = display_path(&args.definition);
    let definition = HeaderDefinition::from_value(&read_json(&args.definition)?)
        .with_context(|| format!("Invalid header definition: {path}"))?;
    let validators =
        construct_header_validators(&definition, &Builder::new(Arc::new(Context::default())))
            .with_context(|| format!("Invalid header definition: {path}"))?;

    let value = args.value.as_deref().map(|raw| header_value(&definition, raw));
    match Validator::default().validate_optional(value.as_ref(), &validators) {
        Ok(()) => Ok(Outcome::Valid),
        Err(Error::Invalid(errors)) => {
            info!(errors = errors.message_count(), "invalid header");
            Ok(Outcome::Invalid(serde_json::to_value(&errors)?))
        }
        Err(e) => Err(e).context("Header validation aborted"),
    }
}
