//! # Generation Pipeline
//!
//! The `Pipeline` is the top-level entry point for generation. It selects
//! generators from the resolved [`TemplateOptions`], runs them over one
//! DataPoint collection and gathers the artifacts and warnings into a
//! [`GeneratedSet`].
//!
//! ```text
//! DataPoints + TemplateOptions
//!         │
//!         ▼
//!   Pipeline::from_options()      model, migration, factory?, seeder?,
//!         │                       request?, resource?, controller?, extras
//!         ▼
//!   Pipeline::run()  ──► GeneratedSet { artifacts, warnings }
//!         │
//!         ▼
//!   GeneratedSet::persist(sink)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use datapoints_codegen::{FsSink, Pipeline};
//! use datapoints_ir::{BlogTemplate, Template};
//!
//! let template = BlogTemplate;
//! let options = template.default_options();
//! let set = Pipeline::from_options(&options).run(&template.data_points(&options), &options)?;
//! set.persist(&mut FsSink)?;
//! ```

use crate::artifact::{ArtifactKind, GeneratedSet};
use crate::generators::{
    ControllerGenerator, FactoryGenerator, Generator, MigrationGenerator, ModelGenerator,
    PolicyGenerator, ProviderGenerator, RequestGenerator, ResourceGenerator, SeederGenerator,
    seeder::{DEFAULT_AGGREGATE_SEEDER, DEFAULT_SEED_COUNT},
};
use crate::ordering::order_by_dependencies;
use chrono::NaiveDateTime;
use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, TemplateOptions};
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// PipelineSettings
// ============================================================================

/// Generator settings that are not part of `TemplateOptions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Class name of the aggregate seeder
    pub seeder_class: String,
    /// Rows created per entity by the seeders
    pub seed_count: u32,
    /// Base time for migration filenames; `None` reads the clock
    pub migration_time: Option<NaiveDateTime>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            seeder_class: DEFAULT_AGGREGATE_SEEDER.to_string(),
            seed_count: DEFAULT_SEED_COUNT,
            migration_time: None,
        }
    }
}

impl PipelineSettings {
    pub fn with_seeder_class(mut self, class: impl Into<String>) -> Self {
        self.seeder_class = class.into();
        self
    }

    pub fn with_seed_count(mut self, count: u32) -> Self {
        self.seed_count = count;
        self
    }

    pub fn with_migration_time(mut self, time: NaiveDateTime) -> Self {
        self.migration_time = Some(time);
        self
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// An ordered list of generators run over the same DataPoints
pub struct Pipeline {
    generators: Vec<Box<dyn Generator>>,
}

/// Artifact kinds selected by `options`, in pipeline order, plus the
/// `additional_files` names that match no kind
pub fn selected_kinds(options: &TemplateOptions) -> (Vec<ArtifactKind>, Vec<String>) {
    let mut wanted: HashSet<ArtifactKind> = HashSet::from([ArtifactKind::Model, ArtifactKind::Migration]);
    if options.with_factory {
        wanted.insert(ArtifactKind::Factory);
    }
    if options.with_seeder {
        wanted.insert(ArtifactKind::Seeder);
    }
    if options.should_generate_requests() {
        wanted.insert(ArtifactKind::Request);
    }
    if options.should_generate_resources() {
        wanted.insert(ArtifactKind::Resource);
    }
    if options.should_generate_controller() {
        wanted.insert(ArtifactKind::Controller);
    }

    let mut unknown = Vec::new();
    for name in &options.additional_files {
        match ArtifactKind::from_tag(name) {
            Some(kind) => {
                wanted.insert(kind);
            }
            None => unknown.push(name.clone()),
        }
    }

    let kinds = ArtifactKind::all()
        .iter()
        .copied()
        .filter(|k| wanted.contains(k))
        .collect();
    (kinds, unknown)
}

impl Pipeline {
    /// An empty pipeline
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    pub fn with_generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    /// Generators selected by `options`, with default settings
    pub fn from_options(options: &TemplateOptions) -> Self {
        Self::from_options_with(options, &PipelineSettings::default())
    }

    /// Generators selected by `options`, configured by `settings`
    pub fn from_options_with(options: &TemplateOptions, settings: &PipelineSettings) -> Self {
        let (kinds, _) = selected_kinds(options);
        kinds
            .into_iter()
            .fold(Self::new(), |pipeline, kind| match kind {
                ArtifactKind::Model => pipeline.with_generator(ModelGenerator),
                ArtifactKind::Migration => {
                    let generator = match settings.migration_time {
                        Some(time) => MigrationGenerator::new().with_timestamp(time),
                        None => MigrationGenerator::new(),
                    };
                    pipeline.with_generator(generator)
                }
                ArtifactKind::Factory => pipeline.with_generator(FactoryGenerator),
                ArtifactKind::Seeder => pipeline.with_generator(
                    SeederGenerator::new()
                        .with_aggregate_class(settings.seeder_class.clone())
                        .with_count(settings.seed_count),
                ),
                ArtifactKind::Request => pipeline.with_generator(RequestGenerator),
                ArtifactKind::Resource => pipeline.with_generator(ResourceGenerator),
                ArtifactKind::Controller => pipeline.with_generator(ControllerGenerator),
                ArtifactKind::Policy => pipeline.with_generator(PolicyGenerator),
                ArtifactKind::Provider => pipeline.with_generator(ProviderGenerator),
            })
    }

    /// Drop every generator of `kind`
    pub fn without(mut self, kind: ArtifactKind) -> Self {
        self.generators.retain(|g| g.kind() != kind);
        self
    }

    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.generators.iter().map(|g| g.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Run every generator in order
    ///
    /// # Errors
    ///
    /// The first generator error aborts the run. Recovered conditions are
    /// reported as warnings on the returned set instead.
    pub fn run(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<GeneratedSet> {
        let mut set = GeneratedSet::new();
        for warning in collect_warnings(data_points, options) {
            tracing::warn!("{}", warning);
            set.add_warning(warning);
        }

        for generator in &self.generators {
            let artifacts = generator.generate(data_points, options)?;
            tracing::info!(
                kind = generator.tag(),
                artifacts = artifacts.len(),
                "generated artifacts"
            );
            set.extend(artifacts);
        }

        tracing::info!(
            data_points = data_points.len(),
            files = set.len(),
            warnings = set.warnings.len(),
            "generation complete",
        );
        Ok(set)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("generators", &self.kinds())
            .finish()
    }
}

/// Conditions generation recovers from but the user should hear about
fn collect_warnings(data_points: &[DataPoint], options: &TemplateOptions) -> Vec<String> {
    let mut warnings = Vec::new();

    let (_, unknown) = selected_kinds(options);
    for name in unknown {
        warnings.push(format!("Unknown additional file kind '{}' ignored", name));
    }

    let present: HashSet<String> = data_points.iter().map(|dp| dp.model_name()).collect();
    for dp in data_points {
        for field in dp.fields().iter().filter(|f| !f.is_known_type()) {
            warnings.push(format!(
                "{}.{}: unknown field type '{}' passed through as-is",
                dp.name(),
                field.name,
                field.field_type
            ));
        }
        for dependency in dp.dependencies() {
            if !present.contains(&dependency) {
                warnings.push(format!(
                    "{} belongs to {}, which is not part of this generation",
                    dp.name(),
                    dependency
                ));
            }
        }
        let skipped = dp.duplicate_relationship_count();
        if skipped > 0 {
            warnings.push(format!(
                "{}: {} relationship(s) sharing an accessor name were skipped",
                dp.name(),
                skipped
            ));
        }
    }

    let order = order_by_dependencies(data_points);
    if order.has_cycle() {
        let names: Vec<&str> = order.unresolved.iter().map(|dp| dp.name()).collect();
        warnings.push(format!(
            "Circular belongsTo dependency between {}; seeding order may violate foreign keys",
            names.join(", ")
        ));
    }

    warnings
}

// ============================================================================
// GenerationSummary
// ============================================================================

/// A human-readable summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Artifact count per kind
    pub counts: BTreeMap<ArtifactKind, usize>,
    pub total_files: usize,
    pub warning_count: usize,
    /// Total bytes of rendered content
    pub total_bytes: usize,
}

impl GenerationSummary {
    /// Build a summary; renders any artifact not rendered yet
    pub fn from_set(set: &GeneratedSet) -> Self {
        let mut counts = BTreeMap::new();
        for artifact in &set.artifacts {
            *counts.entry(artifact.kind()).or_insert(0) += 1;
        }

        Self {
            counts,
            total_files: set.len(),
            warning_count: set.warnings.len(),
            total_bytes: set.artifacts.iter().map(|a| a.content().len()).sum(),
        }
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Format the summary as a boxed report
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(512);

        out.push_str("╔══════════════════════════════════════════════════╗\n");
        out.push_str("║         Scaffolding Complete                     ║\n");
        out.push_str("╠══════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Total Files: {:<35}║\n", self.total_files));
        for (kind, count) in &self.counts {
            out.push_str(&format!("║    {:<11}{:<35}║\n", format!("{}:", kind), count));
        }
        out.push_str(&format!("║  Warnings:    {:<35}║\n", self.warning_count));

        let size_str = if self.total_bytes < 1024 {
            format!("{} B", self.total_bytes)
        } else if self.total_bytes < 1024 * 1024 {
            format!("{:.1} KB", self.total_bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", self.total_bytes as f64 / (1024.0 * 1024.0))
        };
        out.push_str(&format!("║  Total Size:  {:<35}║\n", size_str));
        out.push_str("╚══════════════════════════════════════════════════╝\n");

        out
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

// ============================================================================
// Tests
// ============================================================================
