//! # Migration Generator
//!
//! One `create_{table}_table` migration per DataPoint. The filename prefix
//! is the batch base time plus the DataPoint's rank in dependency order, in
//! seconds, so a migration always sorts after the tables it references.
//! Artifacts themselves stay in DataPoint order.

use super::{Generator, default_literal, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::ordering::order_by_dependencies;
use crate::paths::{MIGRATION_DIR, MIGRATION_NAMESPACE, resolve};
use crate::php::{Method, PhpClass, PhpFile, quote};
use chrono::{Duration, Local, NaiveDateTime};
use datapoints_core::{RelationType, ScaffoldResult};
use datapoints_ir::{DataPoint, Field, Relationship, TemplateOptions};

const MIGRATION: &str = "Illuminate\\Database\\Migrations\\Migration";
const BLUEPRINT: &str = "Illuminate\\Database\\Schema\\Blueprint";
const SCHEMA: &str = "Illuminate\\Support\\Facades\\Schema";

/// Filename timestamp layout: `2024_01_15_093000`
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Generates table-creation migrations
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationGenerator {
    base_time: Option<NaiveDateTime>,
}

impl MigrationGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the batch base time instead of reading the local clock
    pub fn with_timestamp(mut self, base_time: NaiveDateTime) -> Self {
        self.base_time = Some(base_time);
        self
    }

    fn base_time(&self) -> NaiveDateTime {
        self.base_time
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

impl Generator for MigrationGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Migration
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        let paths = resolve(options);
        let order = order_by_dependencies(data_points);
        let base = self.base_time();

        let artifacts = data_points
            .iter()
            .enumerate()
            .map(|(index, dp)| {
                let rank = order.rank_of(dp).unwrap_or(index);
                let stamp = base + Duration::seconds(rank as i64);
                let file_name = migration_file_name(&stamp, &dp.table_name());

                php_artifact(
                    paths.file_in(MIGRATION_DIR, &file_name),
                    ArtifactKind::Migration,
                    build_migration(dp),
                )
            })
            .collect();

        Ok(artifacts)
    }
}

/// `{timestamp}_create_{table}_table.php`
pub fn migration_file_name(stamp: &NaiveDateTime, table: &str) -> String {
    format!("{}_create_{}_table.php", stamp.format(TIMESTAMP_FORMAT), table)
}

// ============================================================================
// Type Table
// ============================================================================

/// Schema builder method for a field type; unknown types pass through
pub fn column_method(field_type: &str) -> &str {
    match field_type {
        "string" | "email" | "url" | "password" => "string",
        "datetime" => "dateTime",
        "ip" => "ipAddress",
        other => other,
    }
}

/// Positional arguments after the column name
fn column_args(field: &Field) -> Vec<String> {
    match field.field_type.as_str() {
        "decimal" => vec!["8".to_string(), "2".to_string()],
        "string" | "email" | "url" | "password" => length_arg(field),
        t if !field.is_known_type() && !t.is_empty() => length_arg(field),
        _ => Vec::new(),
    }
}

fn length_arg(field: &Field) -> Vec<String> {
    field
        .options
        .length
        .map(|len| vec![len.to_string()])
        .unwrap_or_default()
}

// ============================================================================
// Statements
// ============================================================================

fn column_statement(field: &Field) -> String {
    let mut args = vec![quote(&field.name)];
    args.extend(column_args(field));

    let mut statement = format!(
        "$table->{}({})",
        column_method(&field.field_type),
        args.join(", ")
    );

    let opts = &field.options;
    if opts.nullable {
        statement.push_str("->nullable()");
    }
    if opts.unique {
        statement.push_str("->unique()");
    }
    if let Some(default) = &opts.default {
        statement.push_str(&format!("->default({})", default_literal(default).render()));
    }
    if let Some(comment) = &opts.comment {
        statement.push_str(&format!("->comment({})", quote(comment)));
    }
    statement.push(';');
    statement
}

fn relationship_statements(rel: &Relationship) -> Vec<String> {
    match rel.relation_type {
        RelationType::BelongsTo => {
            let constrained = if rel.options.foreign_key.is_some() {
                format!("constrained({})", quote(&rel.related_table()))
            } else {
                "constrained()".to_string()
            };
            vec![format!(
                "$table->foreignId({})->{}->cascadeOnDelete();",
                quote(&rel.foreign_key()),
                constrained
            )]
        }
        RelationType::MorphTo => {
            let name = rel.morph_name();
            if rel.morph_type() == format!("{}_type", name) && rel.morph_id() == format!("{}_id", name) {
                vec![format!("$table->morphs({});", quote(&name))]
            } else {
                vec![
                    format!("$table->string({});", quote(&rel.morph_type())),
                    format!("$table->unsignedBigInteger({});", quote(&rel.morph_id())),
                ]
            }
        }
        _ => Vec::new(),
    }
}

// ============================================================================
// Migration File
// ============================================================================

fn build_migration(dp: &DataPoint) -> PhpFile {
    let table = dp.table_name();
    let mut file = PhpFile::new(MIGRATION_NAMESPACE, PhpClass::anonymous());
    let migration = file.import(MIGRATION);
    file.import(BLUEPRINT);
    file.import(SCHEMA);
    file.class.extends = Some(migration);

    let mut columns = vec!["$table->id();".to_string()];
    columns.extend(dp.fields().iter().map(column_statement));
    for rel in dp.distinct_relationships() {
        // a field already declaring the key column wins
        if rel.is_belongs_to() && dp.fields().iter().any(|f| f.name == rel.foreign_key()) {
            continue;
        }
        columns.extend(relationship_statements(rel));
    }
    if dp.has_timestamps() {
        columns.push("$table->timestamps();".to_string());
    }

    let body = columns
        .iter()
        .map(|c| format!("    {}", c))
        .collect::<Vec<_>>()
        .join("\n");
    let create = format!(
        "Schema::create({}, function (Blueprint $table) {{\n{}\n}});",
        quote(&table),
        body
    );

    file.class
        .method(Method::public("up").returns("void").line(create));
    file.class.method(
        Method::public("down")
            .returns("void")
            .line(format!("Schema::dropIfExists({});", quote(&table))),
    );
    file
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    fn generate(points: &[DataPoint]) -> Vec<GeneratedArtifact> {
        MigrationGenerator::new()
            .with_timestamp(fixed_time())
            .generate(points, &TemplateOptions::default())
            .unwrap()
    }

    #[test]
    fn test_migration_golden() {
        let post = DataPoint::new("Post")
            .add_field(Field::new("title", "string"))
            .add_field(Field::new("content", "text"))
            .add_relationship(Relationship::belongs_to("User"));

        let artifacts = generate(&[post]);
        assert_eq!(
            artifacts[0].file_name(),
            "2024_01_15_093000_create_posts_table.php"
        );

        let expected = r"<?php

namespace Database\Migrations;

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    public function up(): void
    {
        Schema::create('posts', function (Blueprint $table) {
            $table->id();
            $table->string('title');
            $table->text('content');
            $table->foreignId('user_id')->constrained()->cascadeOnDelete();
            $table->timestamps();
        });
    }

    public function down(): void
    {
        Schema::dropIfExists('posts');
    }
};
";
        assert_eq!(artifacts[0].content(), expected);
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let dp = DataPoint::new("Thing").add_field(Field::new("name", "exotic"));
        let content = generate(&[dp])[0].content().to_string();
        assert!(content.contains("$table->exotic('name');"));

        let dp = DataPoint::new("Thing").add_field(Field::new("name", "exotic").with_length(40));
        let content = generate(&[dp])[0].content().to_string();
        assert!(content.contains("$table->exotic('name', 40);"));
    }

    #[test]
    fn test_column_modifiers() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("slug", "string").unique().with_length(120))
            .add_field(Field::new("price", "decimal").nullable())
            .add_field(Field::new("status", "string").with_default("draft").with_comment("workflow"))
            .add_field(Field::new("views", "integer").with_default(0_i64))
            .add_field(Field::new("last_seen", "datetime"))
            .add_field(Field::new("origin", "ip"))
            .add_field(Field::new("contact", "email"));
        let content = generate(&[dp])[0].content().to_string();

        assert!(content.contains("$table->string('slug', 120)->unique();"));
        assert!(content.contains("$table->decimal('price', 8, 2)->nullable();"));
        assert!(content.contains("$table->string('status')->default('draft')->comment('workflow');"));
        assert!(content.contains("$table->integer('views')->default(0);"));
        assert!(content.contains("$table->dateTime('last_seen');"));
        assert!(content.contains("$table->ipAddress('origin');"));
        assert!(content.contains("$table->string('contact');"));
    }

    #[test]
    fn test_custom_foreign_key_and_morphs() {
        let dp = DataPoint::new("Comment")
            .add_relationship(Relationship::belongs_to("User").with_foreign_key("author_id"))
            .add_relationship(Relationship::morph_to("commentable"));
        let content = generate(&[dp])[0].content().to_string();

        assert!(content.contains(
            "$table->foreignId('author_id')->constrained('users')->cascadeOnDelete();"
        ));
        assert!(content.contains("$table->morphs('commentable');"));
    }

    #[test]
    fn test_without_timestamps() {
        let content = generate(&[DataPoint::new("Tag").without_timestamps()])[0]
            .content()
            .to_string();
        assert!(!content.contains("timestamps()"));
    }

    #[test]
    fn test_explicit_key_field_suppresses_foreign_id() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("user_id", "bigInteger"))
            .add_relationship(Relationship::belongs_to("User"));
        let content = generate(&[dp])[0].content().to_string();
        assert!(content.contains("$table->bigInteger('user_id');"));
        assert!(!content.contains("foreignId"));
    }

    #[test]
    fn test_dependent_migration_sorts_after_dependency() {
        let points = vec![
            DataPoint::new("Post").add_relationship(Relationship::belongs_to("Category")),
            DataPoint::new("Category"),
        ];
        let artifacts = generate(&points);

        // emitted in DataPoint order
        assert!(artifacts[0].file_name().ends_with("_create_posts_table.php"));
        assert_eq!(
            artifacts[0].file_name(),
            "2024_01_15_093001_create_posts_table.php"
        );
        assert_eq!(
            artifacts[1].file_name(),
            "2024_01_15_093000_create_categories_table.php"
        );
        assert!(artifacts[1].file_name() < artifacts[0].file_name());
    }

    #[test]
    fn test_stamps_follow_rank_for_every_data_point() {
        let points = vec![
            DataPoint::new("Comment")
                .add_relationship(Relationship::belongs_to("Post"))
                .add_relationship(Relationship::belongs_to("User")),
            DataPoint::new("Post").add_relationship(Relationship::belongs_to("User")),
            DataPoint::new("User"),
        ];
        let names: Vec<String> = generate(&points)
            .iter()
            .map(|a| a.file_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "2024_01_15_093002_create_comments_table.php",
                "2024_01_15_093001_create_posts_table.php",
                "2024_01_15_093000_create_users_table.php",
            ]
        );
    }

    #[test]
    fn test_deterministic_with_pinned_clock() {
        let dp = DataPoint::new("Post").add_field(Field::new("title", "string"));
        let first = generate(&[dp.clone()]);
        let second = generate(&[dp]);
        assert_eq!(first[0].file_name(), second[0].file_name());
        assert_eq!(first[0].content(), second[0].content());
    }

    #[test]
    fn test_path() {
        let artifacts = MigrationGenerator::new()
            .with_timestamp(fixed_time())
            .generate(
                &[DataPoint::new("Post")],
                &TemplateOptions::default().with_output_path("/srv"),
            )
            .unwrap();
        assert_eq!(
            artifacts[0].path(),
            std::path::Path::new("/srv/database/migrations/2024_01_15_093000_create_posts_table.php")
        );
    }
}
