//! # DataPoints CLI
//!
//! Command-line interface for DataPoints.
//!
//! ## Commands
//!
//! - `create` - Scaffold a registered template, interactively or with `--yes`
//! - `make` - Scaffold a single DataPoint described by shorthand flags
//! - `build` - Scaffold every DataPoint in a JSON definition file
//! - `templates` - List registered templates
//! - `check` - Validate a definition file without writing anything
//!

pub mod commands;
pub mod config;
pub mod output;
pub mod prompts;

use clap::{Parser, Subcommand};
use commands::{
    build::BuildCommand, check::CheckCommand, create::CreateCommand, make::MakeCommand,
    templates::TemplatesCommand,
};
use output::Reporter;

// Re-export dependencies for embedding
pub use datapoints_codegen;
pub use datapoints_core;
pub use datapoints_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// DataPoints - entity-driven scaffolding for Laravel applications
#[derive(Debug, Parser)]
#[command(name = "datapoints")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors and the final result line
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scaffold a registered template
    #[command(name = "create")]
    Create(CreateCommand),

    /// Scaffold one DataPoint from shorthand flags
    #[command(name = "make")]
    Make(MakeCommand),

    /// Scaffold every DataPoint in a definition file
    #[command(name = "build")]
    Build(BuildCommand),

    /// List registered templates
    #[command(name = "templates")]
    Templates(TemplatesCommand),

    /// Validate a definition file without writing anything
    #[command(name = "check")]
    Check(CheckCommand),
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Dispatch the parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let reporter = Reporter::new(cli.quiet);

    match cli.command {
        Command::Create(cmd) => cmd.execute(&reporter),
        Command::Make(cmd) => cmd.execute(&reporter),
        Command::Build(cmd) => cmd.execute(&reporter),
        Command::Templates(cmd) => cmd.execute(&reporter),
        Command::Check(cmd) => cmd.execute(&reporter),
    }
}

// ============================================================================
// Tests
// ============================================================================
