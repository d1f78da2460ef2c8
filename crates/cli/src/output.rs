//! Terminal reporting

use colored::Colorize;
use datapoints_codegen::{GeneratedSet, GenerationSummary};
use std::path::Path;

/// Prints command results; `quiet` keeps only the final line
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn heading(&self, text: &str) {
        if !self.quiet {
            println!("{}", text.bold());
        }
    }

    pub fn line(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    pub fn warnings(&self, warnings: &[String]) {
        for warning in warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
    }

    /// List every artifact, then the warnings and the boxed summary
    pub fn generated(&self, set: &GeneratedSet, dry_run: bool) {
        if !self.quiet {
            let marker = if dry_run { "·".dimmed() } else { "✓".green() };
            for artifact in &set.artifacts {
                println!(
                    "  {} {:<10} {}",
                    marker,
                    artifact.kind().tag().cyan(),
                    artifact.path().display()
                );
            }
            println!();
        }

        self.warnings(&set.warnings);

        if !self.quiet {
            print!("{}", GenerationSummary::from_set(set));
        }
    }

    /// Final result line, printed even when quiet
    pub fn done(&self, written: usize, dry_run: bool, root: &Path) {
        if dry_run {
            println!(
                "{} {} file(s) would be written under {} (dry run)",
                "✓".green(),
                written,
                root.display()
            );
        } else {
            println!(
                "{} {} file(s) written under {}",
                "✓".green(),
                written,
                root.display()
            );
        }
    }
}
