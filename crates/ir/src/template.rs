//! Templates: named presets of DataPoints plus default options

use crate::data_point::DataPoint;
use crate::field::Field;
use crate::options::TemplateOptions;
use crate::relationship::Relationship;
use datapoints_core::{ControllerType, ScaffoldError, ScaffoldResult};

// ============================================================================
// Template Trait
// ============================================================================

/// A reusable preset
///
/// Implementations are stateless: `data_points` returns structurally equal
/// collections on every call.
pub trait Template: Send + Sync {
    /// Registry key, e.g. `blog`
    fn name(&self) -> &'static str;

    /// One-line description shown in listings
    fn description(&self) -> &'static str;

    /// Class name of the aggregate seeder for this preset
    fn seeder_class(&self) -> &'static str {
        "DatabaseSeeder"
    }

    /// The entities this preset scaffolds, in declaration order
    fn data_points(&self, options: &TemplateOptions) -> Vec<DataPoint>;

    /// Options this preset starts from before any user override
    fn default_options(&self) -> TemplateOptions {
        TemplateOptions::default()
    }
}

// ============================================================================
// Blog Template
// ============================================================================

/// Posts with comments
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogTemplate;

impl Template for BlogTemplate {
    fn name(&self) -> &'static str {
        "blog"
    }

    fn description(&self) -> &'static str {
        "A blog template with posts and comments"
    }

    fn seeder_class(&self) -> &'static str {
        "BlogDataPointSeeder"
    }

    fn data_points(&self, _options: &TemplateOptions) -> Vec<DataPoint> {
        let post = DataPoint::new("Post")
            .add_field(Field::new("title", "string"))
            .add_field(Field::new("slug", "string").unique())
            .add_field(Field::new("content", "text"))
            .add_field(Field::new("published_at", "timestamp").nullable())
            .add_relationship(Relationship::has_many("Comment"));

        let comment = DataPoint::new("Comment")
            .add_field(Field::new("content", "text"))
            .add_field(Field::new("author_name", "string"))
            .add_field(Field::new("author_email", "string"))
            .add_relationship(Relationship::belongs_to("Post"));

        vec![post, comment]
    }

    fn default_options(&self) -> TemplateOptions {
        TemplateOptions::default().with_controller(ControllerType::Api)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Lookup of templates by name, in registration order
pub struct TemplateRegistry {
    templates: Vec<Box<dyn Template>>,
}

impl TemplateRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Registry holding every built-in template
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(BlogTemplate);
        registry
    }

    /// Add a template; a later registration with the same name replaces the earlier one
    pub fn register(&mut self, template: impl Template + 'static) {
        self.templates.retain(|t| t.name() != template.name());
        self.templates.push(Box::new(template));
    }

    pub fn get(&self, name: &str) -> ScaffoldResult<&dyn Template> {
        self.templates
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .map(|t| t.as_ref())
            .ok_or_else(|| ScaffoldError::TemplateNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Template> {
        self.templates.iter().map(|t| t.as_ref())
    }

    /// `name: description` lines for listings and prompts
    pub fn describe(&self) -> Vec<String> {
        self.iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.names())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
