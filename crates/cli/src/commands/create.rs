//! `datapoints create` subcommand
//!
//! ```text
//! datapoints create                         # choose a template, answer the form
//! datapoints create blog --yes              # template defaults, no questions
//! datapoints create blog --controller web --with policy --output ./app
//! ```

use super::{GenerateArgs, resolve_options, scaffold};
use crate::output::Reporter;
use crate::prompts::{DefaultsPrompts, DialoguerPrompts, PromptSource, choose_template, options_form};
use anyhow::Context;
use clap::Args;
use datapoints_codegen::Pipeline;
use datapoints_ir::TemplateRegistry;
use std::io::IsTerminal;

/// Scaffold a registered template
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Template name; asked for when omitted
    pub template: Option<String>,

    #[command(flatten)]
    pub args: GenerateArgs,

    /// Accept defaults instead of prompting
    #[arg(short, long)]
    pub yes: bool,
}

impl CreateCommand {
    pub fn execute(self, reporter: &Reporter) -> anyhow::Result<()> {
        let interactive = !self.yes && std::io::stdin().is_terminal();
        let prompts: Box<dyn PromptSource> = if interactive {
            Box::new(DialoguerPrompts::new())
        } else {
            Box::new(DefaultsPrompts)
        };
        self.execute_with(prompts.as_ref(), reporter)
    }

    /// Run against an explicit prompt source
    pub fn execute_with(self, prompts: &dyn PromptSource, reporter: &Reporter) -> anyhow::Result<()> {
        let registry = TemplateRegistry::builtin();
        let name = match &self.template {
            Some(name) => name.clone(),
            None => choose_template(prompts, &registry)?,
        };
        let template = registry
            .get(&name)
            .with_context(|| format!("available templates: {}", registry.names().join(", ")))?;

        let config = self.args.load_config()?;
        let options = resolve_options(
            &template.default_options(),
            [config.options.clone(), self.args.overrides()],
        );
        let options = options_form(prompts, &options)?;

        reporter.heading(&format!("Scaffolding template '{}'", template.name()));
        let data_points = template.data_points(&options);
        let settings = self.args.settings(&config, template.seeder_class());
        let pipeline = Pipeline::from_options_with(&options, &settings);

        scaffold(&pipeline, &data_points, &options, self.args.dry_run, reporter)
    }
}

// ============================================================================
// Tests
// ============================================================================
