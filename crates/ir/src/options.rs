//! Generation options and their layering
//!
//! `TemplateOptions` is the fully-resolved value threaded through every
//! generator. `OptionOverrides` is one partial layer (template defaults,
//! a config file, command-line flags) applied on top of another:
//!
//! ```text
//! TemplateOptions::default()
//!     -> Template::default_options()
//!     -> datapoints.toml
//!     -> command-line flags
//!     -> per-field / per-relationship options (inside generators)
//! ```

use datapoints_core::{ControllerType, ScaffoldError, ScaffoldResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

// ============================================================================
// TemplateOptions
// ============================================================================

/// Resolved options for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateOptions {
    pub controller_type: ControllerType,
    /// Reserved; carried through every layer but read by no generator
    pub with_tests: bool,
    pub with_factory: bool,
    pub with_seeder: bool,
    /// Model namespace; `App\Models` when unset
    pub namespace: Option<String>,
    /// Extra artifact kinds to generate, e.g. `policy`
    pub additional_files: Vec<String>,
    /// Application base path; the current directory when unset
    pub output_path: Option<PathBuf>,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            controller_type: ControllerType::None,
            with_tests: false,
            with_factory: true,
            with_seeder: true,
            namespace: None,
            additional_files: Vec::new(),
            output_path: None,
        }
    }
}

impl TemplateOptions {
    /// Create options with built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller(mut self, controller_type: ControllerType) -> Self {
        self.controller_type = controller_type;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_additional_file(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        if !self.additional_files.contains(&kind) {
            self.additional_files.push(kind);
        }
        self
    }

    pub fn without_factory(mut self) -> Self {
        self.with_factory = false;
        self
    }

    pub fn without_seeder(mut self) -> Self {
        self.with_seeder = false;
        self
    }

    // ====================================================================
    // Derived flags
    // ====================================================================

    pub fn should_generate_controller(&self) -> bool {
        self.controller_type.generates_controller()
    }

    pub fn should_generate_requests(&self) -> bool {
        self.controller_type.requires_requests()
    }

    pub fn should_generate_resources(&self) -> bool {
        self.controller_type.requires_resources()
    }

    pub fn should_generate_views(&self) -> bool {
        self.controller_type.requires_views()
    }

    // ====================================================================
    // Map conversion
    // ====================================================================

    /// Flatten into a camelCase key/value map
    pub fn to_map(&self) -> ScaffoldResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ScaffoldError::internal(format!(
                "options serialized to a non-object value: {}",
                other
            ))),
        }
    }

    /// Rebuild from a camelCase key/value map; missing keys take defaults
    pub fn from_map(map: &Map<String, Value>) -> ScaffoldResult<Self> {
        serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ScaffoldError::InvalidConfig(e.to_string()))
    }
}

// ============================================================================
// OptionOverrides
// ============================================================================

/// One partial layer of options; unset fields leave the layer below intact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionOverrides {
    #[serde(alias = "controllerType", skip_serializing_if = "Option::is_none")]
    pub controller_type: Option<ControllerType>,
    #[serde(alias = "withTests", skip_serializing_if = "Option::is_none")]
    pub with_tests: Option<bool>,
    #[serde(alias = "withFactory", skip_serializing_if = "Option::is_none")]
    pub with_factory: Option<bool>,
    #[serde(alias = "withSeeder", skip_serializing_if = "Option::is_none")]
    pub with_seeder: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(alias = "additionalFiles", skip_serializing_if = "Option::is_none")]
    pub additional_files: Option<Vec<String>>,
    #[serde(alias = "outputPath", skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl OptionOverrides {
    /// Apply this layer on top of `base`
    pub fn apply(&self, base: &TemplateOptions) -> TemplateOptions {
        TemplateOptions {
            controller_type: self.controller_type.unwrap_or(base.controller_type),
            with_tests: self.with_tests.unwrap_or(base.with_tests),
            with_factory: self.with_factory.unwrap_or(base.with_factory),
            with_seeder: self.with_seeder.unwrap_or(base.with_seeder),
            namespace: self.namespace.clone().or_else(|| base.namespace.clone()),
            additional_files: self
                .additional_files
                .clone()
                .unwrap_or_else(|| base.additional_files.clone()),
            output_path: self
                .output_path
                .clone()
                .or_else(|| base.output_path.clone()),
        }
    }

    /// Stack `higher` on top of this layer; `higher` wins where set
    pub fn merge(self, higher: OptionOverrides) -> OptionOverrides {
        OptionOverrides {
            controller_type: higher.controller_type.or(self.controller_type),
            with_tests: higher.with_tests.or(self.with_tests),
            with_factory: higher.with_factory.or(self.with_factory),
            with_seeder: higher.with_seeder.or(self.with_seeder),
            namespace: higher.namespace.or(self.namespace),
            additional_files: higher.additional_files.or(self.additional_files),
            output_path: higher.output_path.or(self.output_path),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == OptionOverrides::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = TemplateOptions::default();
        assert_eq!(options.controller_type, ControllerType::None);
        assert!(!options.with_tests);
        assert!(options.with_factory);
        assert!(options.with_seeder);
        assert!(options.namespace.is_none());
        assert!(!options.should_generate_controller());
    }

    #[test]
    fn test_derived_flags_follow_controller_type() {
        let api = TemplateOptions::new().with_controller(ControllerType::Api);
        assert!(api.should_generate_controller());
        assert!(api.should_generate_requests());
        assert!(api.should_generate_resources());
        assert!(!api.should_generate_views());

        let web = TemplateOptions::new().with_controller(ControllerType::Web);
        assert!(web.should_generate_requests());
        assert!(!web.should_generate_resources());
        assert!(web.should_generate_views());
    }

    #[test]
    fn test_map_round_trip() {
        let options = TemplateOptions::new()
            .with_controller(ControllerType::Web)
            .with_namespace("Domain\\Blog\\Models")
            .with_output_path("/srv/app")
            .with_additional_file("policy")
            .without_seeder();

        let map = options.to_map().unwrap();
        assert_eq!(map["controllerType"], "web");
        assert_eq!(map["withSeeder"], false);
        assert_eq!(TemplateOptions::from_map(&map).unwrap(), options);
    }

    #[test]
    fn test_round_trip_of_defaults() {
        let options = TemplateOptions::default();
        let map = options.to_map().unwrap();
        assert_eq!(TemplateOptions::from_map(&map).unwrap(), options);
    }

    #[test]
    fn test_from_partial_map() {
        let mut map = Map::new();
        map.insert("controllerType".into(), Value::from("api-resource"));
        let options = TemplateOptions::from_map(&map).unwrap();
        assert_eq!(options.controller_type, ControllerType::Api);
        assert!(options.with_factory);
    }

    #[test]
    fn test_from_map_rejects_bad_controller() {
        let mut map = Map::new();
        map.insert("controllerType".into(), Value::from("livewire"));
        assert!(TemplateOptions::from_map(&map).is_err());
    }

    #[test]
    fn test_layering_precedence() {
        let builtin = TemplateOptions::default();
        let template = OptionOverrides {
            controller_type: Some(ControllerType::Api),
            namespace: Some("App\\Models".into()),
            ..Default::default()
        };
        let config = OptionOverrides {
            namespace: Some("Domain\\Models".into()),
            with_factory: Some(false),
            ..Default::default()
        };
        let flags = OptionOverrides {
            with_factory: Some(true),
            ..Default::default()
        };

        let resolved = template.merge(config).merge(flags).apply(&builtin);
        assert_eq!(resolved.controller_type, ControllerType::Api);
        assert_eq!(resolved.namespace.as_deref(), Some("Domain\\Models"));
        assert!(resolved.with_factory);
        assert!(resolved.with_seeder);
    }

    #[test]
    fn test_overrides_accept_both_key_styles() {
        let snake: OptionOverrides =
            serde_json::from_str(r#"{"controller_type":"web","with_seeder":false}"#).unwrap();
        let camel: OptionOverrides =
            serde_json::from_str(r#"{"controllerType":"web","withSeeder":false}"#).unwrap();
        assert_eq!(snake, camel);
        assert!(!snake.is_empty());
        assert!(OptionOverrides::default().is_empty());
    }
}
