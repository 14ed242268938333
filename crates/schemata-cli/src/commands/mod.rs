use std::process::ExitCode;

use serde_json::Value;

pub mod check;
pub mod header;

/// Value failed validation.
const EXIT_INVALID: u8 = 1;
/// Schema, definitions or input could not be loaded or built.
const EXIT_ERROR: u8 = 2;

/// Outcome of a validation that ran to completion.
#[derive(Debug)]
pub enum Outcome {
    Valid,
    Invalid(Value),
}

/// Print the outcome and map it to the process exit status.
pub fn report(result: anyhow::Result<Outcome>) -> ExitCode {
    match result {
        Ok(Outcome::Valid) => {
            println!("ok");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Invalid(errors)) => {
            match serde_json::to_string_pretty(&errors) {
                Ok(out) => println!("{out}"),
                Err(e) => eprintln!("Error: {e}"),
            }
            ExitCode::from(EXIT_INVALID)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
