//! Definition files
//!
//! A definition file is a JSON document describing a set of DataPoints and,
//! optionally, an option layer to apply on top of the built-in defaults:
//!
//! ```json
//! {
//!   "dataPoints": [
//!     { "name": "Post", "fields": [{ "name": "title", "type": "string" }] }
//!   ],
//!   "options": { "controllerType": "api" }
//! }
//! ```

use crate::data_point::DataPoint;
use crate::options::OptionOverrides;
use datapoints_core::{ResultExt, ScaffoldError, ScaffoldResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Definition File
// ============================================================================

/// DataPoints plus an option layer, as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionFile {
    #[serde(default)]
    pub data_points: Vec<DataPoint>,

    #[serde(default, skip_serializing_if = "OptionOverrides::is_empty")]
    pub options: OptionOverrides,
}

impl DefinitionFile {
    pub fn new(data_points: Vec<DataPoint>) -> Self {
        Self {
            data_points,
            options: OptionOverrides::default(),
        }
    }

    pub fn with_options(mut self, options: OptionOverrides) -> Self {
        self.options = options;
        self
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> ScaffoldResult<Self> {
        serde_json::from_str(json).map_err(|e| ScaffoldError::InvalidDefinition(e.to_string()))
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> ScaffoldResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Load / Save
// ============================================================================

/// Load a definition file from disk
pub fn load_definition(path: impl AsRef<Path>) -> ScaffoldResult<DefinitionFile> {
    let path = path.as_ref();

    let json = std::fs::read_to_string(path).map_err(|e| ScaffoldError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let definition = DefinitionFile::from_json(&json).with_context(path.display().to_string())?;

    tracing::debug!(
        path = %path.display(),
        data_points = definition.data_points.len(),
        "loaded definition"
    );

    Ok(definition)
}

/// Save a definition file, creating parent directories as needed
pub fn save_definition(definition: &DefinitionFile, path: impl AsRef<Path>) -> ScaffoldResult<()> {
    let path = path.as_ref();
    let json = definition.to_json()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ScaffoldError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| ScaffoldError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::relationship::Relationship;
    use datapoints_core::ControllerType;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> DefinitionFile {
        let post = DataPoint::new("Post")
            .add_field(Field::new("title", "string"))
            .add_relationship(Relationship::belongs_to("User"));
        DefinitionFile::new(vec![post]).with_options(OptionOverrides {
            controller_type: Some(ControllerType::Api),
            ..Default::default()
        })
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("defs").join("blog.json");

        save_definition(&sample(), &path).unwrap();
        assert!(path.exists());

        let loaded = load_definition(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_definition("/nonexistent/definition.json").unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_load_invalid_json_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_definition(&path).unwrap_err();
        assert!(matches!(err, ScaffoldError::WithContext { .. }));
        let message = err.to_string();
        assert!(message.starts_with(&path.display().to_string()));
        assert!(message.contains("Invalid definition file"));
    }

    #[test]
    fn test_invalid_json() {
        let err = DefinitionFile::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidDefinition(_)));
    }

    #[test]
    fn test_unknown_relation_type_is_rejected() {
        let json = r#"{"dataPoints":[{"name":"Post","relationships":[{"type":"ownsMany","related":"Tag"}]}]}"#;
        assert!(DefinitionFile::from_json(json).is_err());
    }

    #[test]
    fn test_minimal_document() {
        let def = DefinitionFile::from_json(r#"{"dataPoints":[{"name":"Tag"}]}"#).unwrap();
        assert_eq!(def.data_points.len(), 1);
        assert!(def.options.is_empty());
    }
}
