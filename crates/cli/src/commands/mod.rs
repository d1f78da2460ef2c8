//! Subcommands
//!
//! `create`, `make` and `build` share [`GenerateArgs`] and end in
//! [`scaffold`]; they differ only in where the DataPoints come from.

pub mod build;
pub mod check;
pub mod create;
pub mod make;
pub mod templates;

use crate::config::ConfigFile;
use crate::output::Reporter;
use anyhow::Context;
use clap::Args;
use datapoints_codegen::{DryRunSink, FileSink, FsSink, GeneratedSet, Pipeline, PipelineSettings};
use datapoints_core::ControllerType;
use datapoints_ir::{DataPoint, OptionOverrides, TemplateOptions};
use std::path::{Path, PathBuf};

/// Option flags shared by the generating commands
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Controller flavour: none, api, web or invokable
    #[arg(long, value_name = "TYPE")]
    pub controller: Option<ControllerType>,

    /// Model namespace, e.g. App\Domain
    #[arg(long)]
    pub namespace: Option<String>,

    /// Application base path to write into
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Record withTests in the options (reserved: no artifact reads it yet)
    #[arg(long)]
    pub with_tests: bool,

    /// Skip model factories
    #[arg(long)]
    pub no_factory: bool,

    /// Skip seeders
    #[arg(long)]
    pub no_seeder: bool,

    /// Extra artifact kind to generate, e.g. policy (repeatable)
    #[arg(long = "with", value_name = "KIND")]
    pub with: Vec<String>,

    /// Config file; defaults to ./datapoints.toml when present
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rows created per entity by the seeders
    #[arg(long, value_name = "N")]
    pub count: Option<u32>,

    /// List the files that would be written without writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// The command-line options layer
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            controller_type: self.controller,
            with_tests: self.with_tests.then_some(true),
            with_factory: self.no_factory.then_some(false),
            with_seeder: self.no_seeder.then_some(false),
            namespace: self.namespace.clone(),
            additional_files: (!self.with.is_empty()).then(|| self.with.clone()),
            output_path: self.output.clone(),
        }
    }

    pub fn load_config(&self) -> anyhow::Result<ConfigFile> {
        let cwd = std::env::current_dir().context("reading the working directory")?;
        ConfigFile::load(self.config.as_deref(), &cwd)
    }

    /// Seeder settings: flag, then config, then `seeder_class`
    pub fn settings(&self, config: &ConfigFile, seeder_class: &str) -> PipelineSettings {
        let mut settings = PipelineSettings::default().with_seeder_class(
            config
                .seeder
                .class
                .clone()
                .unwrap_or_else(|| seeder_class.to_string()),
        );
        if let Some(count) = self.count.or(config.seeder.count) {
            settings = settings.with_seed_count(count);
        }
        settings
    }
}

/// Stack option layers on `base`, lowest precedence first
pub fn resolve_options(
    base: &TemplateOptions,
    layers: impl IntoIterator<Item = OptionOverrides>,
) -> TemplateOptions {
    layers
        .into_iter()
        .fold(OptionOverrides::default(), OptionOverrides::merge)
        .apply(base)
}

/// Run `pipeline` and persist (or list) the result
pub fn scaffold(
    pipeline: &Pipeline,
    data_points: &[DataPoint],
    options: &TemplateOptions,
    dry_run: bool,
    reporter: &Reporter,
) -> anyhow::Result<()> {
    tracing::debug!(
        data_points = data_points.len(),
        generators = pipeline.len(),
        "starting generation"
    );
    let set = pipeline
        .run(data_points, options)
        .context("generation failed")?;

    let root = options
        .output_path
        .as_deref()
        .unwrap_or_else(|| Path::new("."));

    let written = if dry_run {
        let mut sink = DryRunSink::new();
        persist(&set, &mut sink)?
    } else {
        persist(&set, &mut FsSink)?
    };

    reporter.generated(&set, dry_run);
    reporter.done(written, dry_run, root);
    Ok(())
}

fn persist(set: &GeneratedSet, sink: &mut dyn FileSink) -> anyhow::Result<usize> {
    set.persist(sink).context("writing generated files")
}

// ============================================================================
// Tests
// ============================================================================
