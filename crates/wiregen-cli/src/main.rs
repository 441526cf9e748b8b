//! wiregen CLI - Accessor and wire-conversion generator for Go SDK types
//!
//! Commands:
//! - `wiregen generate` - Write `_generated.go` files for a source directory
//! - `wiregen check` - Verify generated files are up to date

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use wiregen::CodegenError;

mod check;
mod generate;
mod logging;
mod target;

use target::TargetArgs;

/// Exit code for failures that are not generator errors
const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "wiregen")]
#[command(author, version, about = "Accessor and wire-conversion generator for Go SDK types", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate accessor and conversion files
    Generate {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the files that would be written without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Fail if any generated file is missing or out of date
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Commands::Generate { target, dry_run } => generate::run(target, *dry_run),
        Commands::Check { target } => check::run(target),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Stable exit code for `err`, taken from the generator error it wraps
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CodegenError>())
        .and_then(|e| u8::try_from(e.exit_code()).ok())
        .unwrap_or(EXIT_FAILURE)
}
