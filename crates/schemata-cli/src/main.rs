use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod util;

#[derive(Parser)]
#[command(name = "schemata", about = "Validate JSON documents against schemata schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON value against a schema
    Check(commands::check::Args),
    /// Validate a raw header value against a header definition
    Header(commands::header::Args),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Header(args) => commands::header::run(args),
    }
}
