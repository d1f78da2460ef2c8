//! # DataPoints Codegen
//!
//! Artifact generation for DataPoints.
//!
//! This crate turns a DataPoint collection plus resolved options into the
//! PHP source files of a Laravel application.
//!
//! ## Features
//!
//! - **Generators**: model, migration, factory, seeder, request, resource,
//!   controller, policy and auth provider
//! - **PHP builder**: structured classes rendered in one fixed style
//! - **Dependency ordering**: `belongsTo`-aware ordering for seeders and
//!   migration timestamps
//! - **Pipeline**: generator selection from options, warnings, summaries
//! - **Sinks**: write to disk or dry-run
//!

// ============================================================================
// Modules
// ============================================================================

pub mod artifact;
pub mod generators;
pub mod ordering;
pub mod paths;
pub mod php;
pub mod pipeline;
pub mod sink;

// ============================================================================
// Re-exports
// ============================================================================

pub use artifact::{ArtifactKind, GeneratedArtifact, GeneratedSet};
pub use generators::{
    ControllerGenerator, FactoryGenerator, Generator, MigrationGenerator, ModelGenerator,
    PolicyGenerator, ProviderGenerator, RequestGenerator, ResourceGenerator, SeederGenerator,
};
pub use generators::seeder::{DEFAULT_AGGREGATE_SEEDER, DEFAULT_SEED_COUNT};
pub use ordering::{DependencyOrder, order_by_dependencies};
pub use paths::{ResolvedPaths, resolve};
pub use pipeline::{GenerationSummary, Pipeline, PipelineSettings, selected_kinds};
pub use sink::{DryRunSink, FileSink, FsSink};

use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, TemplateOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate every artifact `options` selects, with default settings
///
/// Shorthand for `Pipeline::from_options(options).run(data_points, options)`.
pub fn generate(data_points: &[DataPoint], options: &TemplateOptions) -> ScaffoldResult<GeneratedSet> {
    Pipeline::from_options(options).run(data_points, options)
}

/// Produce a [`GenerationSummary`] from a [`GeneratedSet`]
pub fn summarize(set: &GeneratedSet) -> GenerationSummary {
    GenerationSummary::from_set(set)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use datapoints_ir::Field;

    #[test]
    fn test_standalone_generate_function() {
        let points = vec![DataPoint::new("Post").add_field(Field::new("title", "string"))];
        let set = generate(&points, &TemplateOptions::default()).unwrap();
        assert_eq!(set.len(), 5);

        let summary = summarize(&set);
        assert_eq!(summary.total_files, 5);
        assert!(summary.total_bytes > 0);
    }

    #[test]
    fn test_empty_collection() {
        let set = generate(&[], &TemplateOptions::default()).unwrap();
        assert!(set.is_empty());
        assert!(!set.has_warnings());
    }
}
