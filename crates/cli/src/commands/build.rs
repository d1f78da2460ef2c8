//! `datapoints build` subcommand
//!
//! Scaffolds every DataPoint of a JSON definition file. The file's own
//! `options` sit between the config file and the command-line flags.

use super::{GenerateArgs, resolve_options, scaffold};
use crate::output::Reporter;
use anyhow::Context;
use clap::Args;
use datapoints_codegen::{DEFAULT_AGGREGATE_SEEDER, Pipeline};
use datapoints_ir::{TemplateOptions, load_definition};
use std::path::PathBuf;

/// Scaffold every DataPoint in a definition file
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Definition file (JSON)
    pub definition: PathBuf,

    #[command(flatten)]
    pub args: GenerateArgs,
}

impl BuildCommand {
    pub fn execute(self, reporter: &Reporter) -> anyhow::Result<()> {
        let definition = load_definition(&self.definition)
            .with_context(|| format!("loading {}", self.definition.display()))?;
        if definition.data_points.is_empty() {
            reporter.warnings(&[format!(
                "{} declares no DataPoints",
                self.definition.display()
            )]);
        }

        let config = self.args.load_config()?;
        let options = resolve_options(
            &TemplateOptions::default(),
            [config.options.clone(), definition.options.clone(), self.args.overrides()],
        );
        let settings = self.args.settings(&config, DEFAULT_AGGREGATE_SEEDER);
        let pipeline = Pipeline::from_options_with(&options, &settings);

        reporter.heading(&format!(
            "Scaffolding {} DataPoint(s) from {}",
            definition.data_points.len(),
            self.definition.display()
        ));
        scaffold(
            &pipeline,
            &definition.data_points,
            &options,
            self.args.dry_run,
            reporter,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEFINITION: &str = r#"{
  "dataPoints": [
    { "name": "Author", "fields": [{ "name": "name", "type": "string" }] },
    {
      "name": "Book",
      "fields": [{ "name": "title", "type": "string" }],
      "relationships": [{ "type": "belongsTo", "related": "Author" }]
    }
  ],
  "options": { "controllerType": "api", "withSeeder": false }
}"#;

    #[test]
    fn test_definition_options_apply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, DEFINITION).unwrap();

        let cmd = BuildCommand {
            definition: path,
            args: GenerateArgs {
                output: Some(dir.path().join("app")),
                ..Default::default()
            },
        };
        cmd.execute(&Reporter::new(true)).unwrap();

        let root = dir.path().join("app");
        assert!(root.join("app/Http/Controllers/BookController.php").is_file());
        assert!(root.join("app/Http/Resources/BookResource.php").is_file());
        assert!(!root.join("database/seeders").exists());
    }

    #[test]
    fn test_flags_beat_definition_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, DEFINITION).unwrap();

        let cmd = BuildCommand {
            definition: path,
            args: GenerateArgs {
                output: Some(dir.path().to_path_buf()),
                controller: Some(datapoints_core::ControllerType::None),
                dry_run: true,
                ..Default::default()
            },
        };
        cmd.execute(&Reporter::new(true)).unwrap();
        assert!(!dir.path().join("app").exists());
    }

    #[test]
    fn test_missing_definition() {
        let dir = TempDir::new().unwrap();
        let cmd = BuildCommand {
            definition: dir.path().join("missing.json"),
            args: GenerateArgs::default(),
        };
        let err = cmd.execute(&Reporter::new(true)).unwrap_err();
        assert!(err.to_string().contains("loading"));
    }
}
