//! # Seeder Generator
//!
//! One seeder per DataPoint plus an aggregate seeder. A DataPoint with
//! `belongsTo` relationships first creates the related models, then
//! sequences its own factory so that row `i` points at related row `i`.
//!
//! The aggregate seeder truncates every table with foreign-key checks off,
//! then calls the per-entity seeders in dependency order.

use super::{Generator, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::ordering::order_by_dependencies;
use crate::paths::{ResolvedPaths, SEEDER_NAMESPACE, resolve};
use crate::php::{Method, PhpClass, PhpFile, quote};
use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, TemplateOptions, naming};

const SEEDER: &str = "Illuminate\\Database\\Seeder";
const DB: &str = "Illuminate\\Support\\Facades\\DB";

pub const DEFAULT_AGGREGATE_SEEDER: &str = "DatabaseSeeder";
pub const DEFAULT_SEED_COUNT: u32 = 10;

/// Generates per-entity seeders and the aggregate seeder
#[derive(Debug, Clone)]
pub struct SeederGenerator {
    aggregate_class: String,
    count: u32,
}

impl Default for SeederGenerator {
    fn default() -> Self {
        Self {
            aggregate_class: DEFAULT_AGGREGATE_SEEDER.to_string(),
            count: DEFAULT_SEED_COUNT,
        }
    }
}

impl SeederGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class name of the aggregate seeder
    pub fn with_aggregate_class(mut self, class: impl Into<String>) -> Self {
        self.aggregate_class = class.into();
        self
    }

    /// Rows created per entity
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn aggregate_class(&self) -> &str {
        &self.aggregate_class
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Generator for SeederGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Seeder
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        if data_points.is_empty() {
            return Ok(Vec::new());
        }

        let paths = resolve(options);
        let mut artifacts: Vec<GeneratedArtifact> = data_points
            .iter()
            .map(|dp| {
                let class = seeder_class(dp);
                php_artifact(
                    paths.class_path(SEEDER_NAMESPACE, &class),
                    ArtifactKind::Seeder,
                    self.build_seeder(dp, &class, &paths),
                )
            })
            .collect();

        artifacts.push(php_artifact(
            paths.class_path(SEEDER_NAMESPACE, &self.aggregate_class),
            ArtifactKind::Seeder,
            self.build_aggregate(data_points),
        ));

        Ok(artifacts)
    }
}

fn seeder_class(dp: &DataPoint) -> String {
    format!("{}Seeder", dp.model_name())
}

impl SeederGenerator {
    fn build_seeder(&self, dp: &DataPoint, class: &str, paths: &ResolvedPaths) -> PhpFile {
        let mut file = PhpFile::new(SEEDER_NAMESPACE, PhpClass::new(class));
        let base = file.import(SEEDER);
        file.class.extends = Some(base);

        let model = file.import(&paths.model_class(&dp.model_name()));
        let mut run = Method::public("run")
            .returns("void")
            .line(format!("$count = {};", self.count))
            .blank();

        let parents = dp.belongs_to();

        if parents.is_empty() {
            run = run.line(format!("{}::factory($count)->create();", model));
        } else {
            let mut sequence = String::new();
            for rel in &parents {
                let related = file.import(&paths.model_class(&rel.related_model()));
                let variable = naming::camel(&naming::plural(&rel.related));
                run = run.line(format!(
                    "${} = {}::factory($count)->create();",
                    variable, related
                ));
                sequence.push_str(&format!(
                    "        {} => ${}[$sequence->index]->id,\n",
                    quote(&rel.foreign_key()),
                    variable
                ));
            }
            run = run.blank().line(format!(
                "{}::factory($count)\n    ->sequence(fn ($sequence) => [\n{}    ])\n    ->create();",
                model, sequence
            ));
        }

        file.class.method(run);
        file
    }

    fn build_aggregate(&self, data_points: &[DataPoint]) -> PhpFile {
        let mut file = PhpFile::new(SEEDER_NAMESPACE, PhpClass::new(&self.aggregate_class));
        let base = file.import(SEEDER);
        file.class.extends = Some(base);
        let db = file.import(DB);

        let mut run = Method::public("run")
            .returns("void")
            .line(format!("{}::statement('SET FOREIGN_KEY_CHECKS=0;');", db));
        for dp in data_points {
            run = run.line(format!("{}::table({})->truncate();", db, quote(&dp.table_name())));
        }
        run = run
            .line(format!("{}::statement('SET FOREIGN_KEY_CHECKS=1;');", db))
            .blank();

        let order = order_by_dependencies(data_points);
        for dp in &order.ordered {
            run = run.line(format!("$this->call({}::class);", seeder_class(dp)));
        }

        file.class.method(run);
        file
    }
}

// ============================================================================
// Tests
// ============================================================================
