//! # Artifact Generators
//!
//! One generator per artifact kind. Each is a pure function of the DataPoint
//! collection, the resolved options and the lookup tables it owns:
//!
//! | Generator | Artifacts |
//! |---|---|
//! | [`ModelGenerator`] | `app/Models/{Model}.php` |
//! | [`MigrationGenerator`] | `database/migrations/{timestamp}_create_{table}_table.php` |
//! | [`FactoryGenerator`] | `database/factories/{Model}Factory.php` |
//! | [`SeederGenerator`] | `database/seeders/{Model}Seeder.php` + aggregate seeder |
//! | [`RequestGenerator`] | `app/Http/Requests/{Store,Update}{Model}Request.php` |
//! | [`ResourceGenerator`] | `app/Http/Resources/{Model}{Resource,Collection}.php` |
//! | [`ControllerGenerator`] | `app/Http/Controllers/{Model}Controller.php` |
//! | [`PolicyGenerator`] | `app/Policies/{Model}Policy.php` |
//! | [`ProviderGenerator`] | `app/Providers/AuthServiceProvider.php` |
//!
//! Artifacts come out in DataPoint order; aggregate artifacts come last.

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::php::{PhpFile, PhpValue, quote};
use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, DefaultValue, TemplateOptions};
use std::path::PathBuf;

pub mod controller;
pub mod factory;
pub mod migration;
pub mod model;
pub mod policy;
pub mod provider;
pub mod request;
pub mod resource;
pub mod seeder;

pub use controller::ControllerGenerator;
pub use factory::FactoryGenerator;
pub use migration::MigrationGenerator;
pub use model::ModelGenerator;
pub use policy::PolicyGenerator;
pub use provider::ProviderGenerator;
pub use request::RequestGenerator;
pub use resource::ResourceGenerator;
pub use seeder::SeederGenerator;

// ============================================================================
// Generator Trait
// ============================================================================

/// Derives one kind of artifact from a DataPoint collection
pub trait Generator: Send + Sync {
    /// The artifact kind this generator produces
    fn kind(&self) -> ArtifactKind;

    /// Stable tag identifying the artifact kind
    fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    /// Produce artifacts for every DataPoint, in DataPoint order
    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>>;
}

/// A column default as a PHP literal: strings quoted, everything else verbatim
pub(crate) fn default_literal(value: &DefaultValue) -> PhpValue {
    match value {
        DefaultValue::Bool(b) => PhpValue::Bool(*b),
        DefaultValue::Int(i) => PhpValue::Int(*i),
        DefaultValue::Float(f) => PhpValue::raw(f.to_string()),
        DefaultValue::Text(s) => PhpValue::str(s.clone()),
    }
}

/// Comma-separated call arguments; unset trailing arguments are dropped,
/// unset middle arguments become `null`
pub(crate) fn call_args(first: &str, optional: &[Option<String>]) -> String {
    let used = optional
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1);

    let mut args = vec![first.to_string()];
    args.extend(optional[..used].iter().map(|arg| match arg {
        Some(value) => quote(value),
        None => "null".to_string(),
    }));
    args.join(", ")
}

/// Wrap a built file in an artifact that renders on first access
pub(crate) fn php_artifact(path: PathBuf, kind: ArtifactKind, file: PhpFile) -> GeneratedArtifact {
    tracing::debug!(path = %path.display(), kind = kind.tag(), "artifact assembled");
    GeneratedArtifact::deferred(path, kind, move || file.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_call_args() {
        assert_eq!(call_args("User::class", &[]), "User::class");
        assert_eq!(call_args("User::class", &[None, None]), "User::class");
        assert_eq!(
            call_args("User::class", &[Some("author_id".into()), None]),
            "User::class, 'author_id'"
        );
        assert_eq!(
            call_args("Tag::class", &[None, Some("tag_id".into())]),
            "Tag::class, null, 'tag_id'"
        );
    }

    #[test]
    fn test_default_literal() {
        assert_eq!(default_literal(&DefaultValue::Bool(true)).render(), "true");
        assert_eq!(default_literal(&DefaultValue::Int(3)).render(), "3");
        assert_eq!(default_literal(&DefaultValue::Float(1.5)).render(), "1.5");
        assert_eq!(default_literal(&DefaultValue::Text("it's".into())).render(), "'it\\'s'");
    }

    #[test]
    fn test_tags_match_kinds() {
        let generators: Vec<Box<dyn Generator>> = vec![
            Box::new(ModelGenerator),
            Box::new(MigrationGenerator::new()),
            Box::new(FactoryGenerator),
            Box::new(SeederGenerator::new()),
            Box::new(RequestGenerator),
            Box::new(ResourceGenerator),
            Box::new(ControllerGenerator),
            Box::new(PolicyGenerator),
            Box::new(ProviderGenerator),
        ];
        let tags: Vec<&str> = generators.iter().map(|g| g.tag()).collect();
        assert_eq!(
            tags,
            ArtifactKind::all().iter().map(|k| k.tag()).collect::<Vec<_>>()
        );
    }
}
