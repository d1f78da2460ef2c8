//! `datapoints make` subcommand
//!
//! ```text
//! datapoints make Post -f title:string -f slug:string:unique -r hasMany:Comment
//! datapoints make Tag -f name:string:length=50 --no-timestamps --controller api
//! ```

use super::{GenerateArgs, resolve_options, scaffold};
use crate::output::Reporter;
use anyhow::{Context, bail};
use clap::Args;
use datapoints_codegen::{ArtifactKind, DEFAULT_AGGREGATE_SEEDER, Pipeline};
use datapoints_ir::{DataPoint, DataPointChanges, Field, Relationship, TemplateOptions};

/// Scaffold one DataPoint from shorthand flags
#[derive(Debug, Args)]
pub struct MakeCommand {
    /// Entity name, e.g. Post
    pub name: String,

    /// Field as name:type[:nullable|:unique|:length=N] (repeatable)
    #[arg(short, long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Relationship as type:Related, e.g. belongsTo:User (repeatable)
    #[arg(short, long = "relationship", value_name = "RELATION")]
    pub relationships: Vec<String>,

    /// Model without created_at/updated_at
    #[arg(long)]
    pub no_timestamps: bool,

    /// Skip the migration
    #[arg(long)]
    pub no_migration: bool,

    #[command(flatten)]
    pub args: GenerateArgs,
}

impl MakeCommand {
    pub fn execute(self, reporter: &Reporter) -> anyhow::Result<()> {
        let data_point = self.data_point()?;

        let config = self.args.load_config()?;
        let options = resolve_options(
            &TemplateOptions::default(),
            [config.options.clone(), self.args.overrides()],
        );
        let settings = self.args.settings(&config, DEFAULT_AGGREGATE_SEEDER);

        let mut pipeline = Pipeline::from_options_with(&options, &settings);
        if self.no_migration {
            pipeline = pipeline.without(ArtifactKind::Migration);
        }

        reporter.heading(&format!("Scaffolding {}", data_point.model_name()));
        scaffold(&pipeline, &[data_point], &options, self.args.dry_run, reporter)
    }

    /// Build the DataPoint the flags describe
    pub fn data_point(&self) -> anyhow::Result<DataPoint> {
        if self.name.trim().is_empty() {
            bail!("entity name cannot be empty");
        }

        let fields = self
            .fields
            .iter()
            .map(|f| Field::parse_shorthand(f).with_context(|| format!("invalid --field '{}'", f)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let relationships = self
            .relationships
            .iter()
            .map(|r| {
                Relationship::parse_shorthand(r)
                    .with_context(|| format!("invalid --relationship '{}'", r))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(DataPoint::new(self.name.trim()).with(DataPointChanges {
            fields: Some(fields),
            relationships: Some(relationships),
            has_timestamps: Some(!self.no_timestamps),
            ..Default::default()
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use datapoints_core::RelationType;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn command(name: &str, fields: &[&str], relationships: &[&str]) -> MakeCommand {
        MakeCommand {
            name: name.to_string(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
            relationships: relationships.iter().map(|s| s.to_string()).collect(),
            no_timestamps: false,
            no_migration: false,
            args: GenerateArgs::default(),
        }
    }

    #[test]
    fn test_data_point_from_flags() {
        let dp = command("Post", &["title:string", "slug:string:unique"], &["belongsTo:User"])
            .data_point()
            .unwrap();

        assert_eq!(dp.name(), "Post");
        assert_eq!(dp.fields().len(), 2);
        assert!(dp.fields()[1].options.unique);
        assert_eq!(dp.relationships()[0].relation_type, RelationType::BelongsTo);
        assert!(dp.has_timestamps());
    }

    #[test]
    fn test_bad_shorthand_names_the_flag() {
        let err = command("Post", &["title"], &[]).data_point().unwrap_err();
        assert!(err.to_string().contains("invalid --field 'title'"));

        let err = command("Post", &[], &["likes:User"]).data_point().unwrap_err();
        assert!(err.to_string().contains("invalid --relationship 'likes:User'"));
    }

    #[test]
    fn test_blank_name() {
        assert!(command("  ", &[], &[]).data_point().is_err());
    }

    #[test]
    fn test_writes_without_migration() {
        let dir = TempDir::new().unwrap();
        let mut cmd = command("Tag", &["name:string"], &[]);
        cmd.no_migration = true;
        cmd.no_timestamps = true;
        cmd.args.output = Some(dir.path().to_path_buf());
        cmd.execute(&Reporter::new(true)).unwrap();

        let model = std::fs::read_to_string(dir.path().join("app/Models/Tag.php")).unwrap();
        assert!(model.contains("public $timestamps = false;"));
        assert!(!dir.path().join("database/migrations").exists());
        assert!(dir.path().join("database/factories/TagFactory.php").is_file());
    }
}
