//! Namespace and output path resolution shared by every generator
//!
//! `resolve(options)` is the single place that turns `TemplateOptions` into
//! a model namespace and an application base path. Generators never read
//! `options.namespace` or `options.output_path` directly.

use datapoints_ir::TemplateOptions;
use std::path::{Path, PathBuf};

// ============================================================================
// Framework Layout
// ============================================================================

pub const DEFAULT_MODEL_NAMESPACE: &str = "App\\Models";
pub const FACTORY_NAMESPACE: &str = "Database\\Factories";
pub const SEEDER_NAMESPACE: &str = "Database\\Seeders";
pub const MIGRATION_NAMESPACE: &str = "Database\\Migrations";
pub const REQUEST_NAMESPACE: &str = "App\\Http\\Requests";
pub const RESOURCE_NAMESPACE: &str = "App\\Http\\Resources";
pub const CONTROLLER_NAMESPACE: &str = "App\\Http\\Controllers";
pub const POLICY_NAMESPACE: &str = "App\\Policies";
pub const PROVIDER_NAMESPACE: &str = "App\\Providers";

/// The authenticatable user model policies are written against
pub const AUTH_USER_CLASS: &str = "App\\Models\\User";

/// Migrations are loaded by path, not autoloaded by namespace
pub const MIGRATION_DIR: &str = "database/migrations";

// ============================================================================
// Resolution
// ============================================================================

/// Namespace and base path for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Namespace the models live in
    pub model_namespace: String,
    /// Application root every artifact path is relative to
    pub base_path: PathBuf,
}

/// Resolve the model namespace and base path from options
pub fn resolve(options: &TemplateOptions) -> ResolvedPaths {
    let model_namespace = options
        .namespace
        .as_deref()
        .map(|ns| ns.trim().trim_matches('\\'))
        .filter(|ns| !ns.is_empty())
        .unwrap_or(DEFAULT_MODEL_NAMESPACE)
        .to_string();

    let base_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    ResolvedPaths {
        model_namespace,
        base_path,
    }
}

impl ResolvedPaths {
    /// Fully-qualified model class
    pub fn model_class(&self, model: &str) -> String {
        format!("{}\\{}", self.model_namespace, model)
    }

    /// File for a model class
    pub fn model_path(&self, model: &str) -> PathBuf {
        self.class_path(&self.model_namespace, model)
    }

    /// File for `class` in `namespace`, following PSR-4 roots
    pub fn class_path(&self, namespace: &str, class: &str) -> PathBuf {
        self.base_path
            .join(namespace_dir(namespace))
            .join(format!("{}.php", class))
    }

    /// File under a plain directory of the application
    pub fn file_in(&self, dir: impl AsRef<Path>, file: &str) -> PathBuf {
        self.base_path.join(dir).join(file)
    }
}

/// Directory for a namespace: `App\Http\Requests` -> `app/Http/Requests`,
/// `Database\Factories` -> `database/factories`
pub fn namespace_dir(namespace: &str) -> PathBuf {
    let mut segments = namespace.trim_matches('\\').split('\\');
    let mut dir = PathBuf::new();

    match segments.next() {
        Some("App") => {
            dir.push("app");
            segments.for_each(|s| dir.push(s));
        }
        Some("Database") => {
            dir.push("database");
            segments.for_each(|s| dir.push(s.to_ascii_lowercase()));
        }
        Some("Tests") => {
            dir.push("tests");
            segments.for_each(|s| dir.push(s));
        }
        Some(first) => {
            dir.push(first);
            segments.for_each(|s| dir.push(s));
        }
        None => {}
    }

    dir
}

// ============================================================================
// Tests
// ============================================================================
