//! # formval CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formval_cli::check::{run_check, CheckArgs};
use formval_cli::field::{run_field, FieldArgs};
use formval_cli::kinds::{run_kinds, KindsArgs};

/// formval: form field validation.
///
/// Normalizes and checks form input against a catalog of per-type field
/// validators, one value at a time or a whole document against a form
/// declaration.
#[derive(Parser, Debug)]
#[command(name = "formval", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the field types the catalog can build.
    Kinds(KindsArgs),

    /// Evaluate one value against a single field validator.
    Field(FieldArgs),

    /// Check a values document against a form declaration.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("formval CLI starting");

    let result = match cli.command {
        Commands::Kinds(args) => run_kinds(&args),
        Commands::Field(args) => run_field(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
