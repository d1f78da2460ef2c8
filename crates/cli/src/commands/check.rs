//! `datapoints check` subcommand
//!
//! Validates a definition file and dry-runs generation to surface the
//! warnings a build would print. Nothing is written.

use crate::output::Reporter;
use anyhow::{Context, bail};
use clap::Args;
use colored::Colorize;
use datapoints_codegen::Pipeline;
use datapoints_core::Validatable;
use datapoints_ir::{DefinitionFile, TemplateOptions, load_definition};
use std::path::PathBuf;

/// Validate a definition file without writing anything
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Definition file (JSON)
    pub definition: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Problems found in one definition file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validate every DataPoint and collect generation warnings
pub fn check_definition(definition: &DefinitionFile) -> CheckReport {
    let mut report = CheckReport::default();

    for dp in &definition.data_points {
        report.errors.extend(dp.validation_errors());
    }

    let options = definition.options.apply(&TemplateOptions::default());
    match Pipeline::from_options(&options).run(&definition.data_points, &options) {
        Ok(set) => report.warnings = set.warnings,
        Err(e) => report.errors.push(e.to_string()),
    }

    report
}

impl CheckCommand {
    pub fn execute(self, reporter: &Reporter) -> anyhow::Result<()> {
        let definition = load_definition(&self.definition)
            .with_context(|| format!("loading {}", self.definition.display()))?;
        let report = check_definition(&definition);

        for error in &report.errors {
            eprintln!("{} {}", "error:".red().bold(), error);
        }
        reporter.warnings(&report.warnings);

        if !report.errors.is_empty() {
            bail!("{} error(s) in {}", report.errors.len(), self.definition.display());
        }
        if self.strict && !report.warnings.is_empty() {
            bail!(
                "{} warning(s) in {} (strict)",
                report.warnings.len(),
                self.definition.display()
            );
        }

        println!(
            "{} {} DataPoint(s) in {} look good",
            "✓".green(),
            definition.data_points.len(),
            self.definition.display()
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
