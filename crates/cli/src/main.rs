//! DataPoints
//!
//! Entity-driven scaffolding for Laravel applications.
//!
//! This is the main entry point for the `datapoints` command.

use clap::Parser;
use colored::Colorize;
use datapoints_cli::{Cli, VERSION};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = datapoints_cli::run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!();
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║                                                           ║");
    println!("║   DataPoints v{:<44}║", VERSION);
    println!("║   Entity-driven scaffolding for Laravel                   ║");
    println!("║                                                           ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
}
