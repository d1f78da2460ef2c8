//! `datapoints templates` subcommand

use crate::output::Reporter;
use clap::Args;
use colored::Colorize;
use datapoints_ir::TemplateRegistry;

/// List registered templates
#[derive(Debug, Args)]
pub struct TemplatesCommand {
    /// Also list each template's entities
    #[arg(long)]
    pub detailed: bool,
}

impl TemplatesCommand {
    pub fn execute(self, reporter: &Reporter) -> anyhow::Result<()> {
        let registry = TemplateRegistry::builtin();
        reporter.heading("Available templates");

        for template in registry.iter() {
            println!("  {}  {}", template.name().green().bold(), template.description());
            if self.detailed {
                let options = template.default_options();
                let names: Vec<String> = template
                    .data_points(&options)
                    .iter()
                    .map(|dp| dp.model_name())
                    .collect();
                println!(
                    "      {} {}  {} {}",
                    "entities:".dimmed(),
                    names.join(", "),
                    "controller:".dimmed(),
                    options.controller_type
                );
            }
        }
        Ok(())
    }
}
