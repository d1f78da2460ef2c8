//! Error types for DataPoints
//!
//! This module provides unified error handling across the scaffolder,
//! covering shorthand parsing, generation, validation, IO and
//! serialization failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for DataPoints
#[derive(Debug, Error)]
pub enum ScaffoldError {
    // ========================================================================
    // Parse Errors
    // ========================================================================
    /// A `name:type` or `type:Related` shorthand could not be parsed
    #[error("Malformed shorthand '{input}': expected {expected}")]
    MalformedShorthand { input: String, expected: String },

    /// Relationship type name outside the known vocabulary
    #[error("Unknown relationship type: '{0}'")]
    UnknownRelationType(String),

    /// Controller type name outside the known vocabulary
    #[error("Unknown controller type: '{0}'")]
    UnknownControllerType(String),

    // ========================================================================
    // Generation Errors
    // ========================================================================
    /// A generator has no code shape for this relationship type
    #[error("Unsupported relationship type '{relation}' on '{data_point}'")]
    UnsupportedRelationship { relation: String, data_point: String },

    /// No template registered under this name
    #[error("Template not found: '{0}'")]
    TemplateNotFound(String),

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// DataPoint validation failed
    #[error("DataPoint validation failed for '{data_point}': {message}")]
    DataPointValidation { data_point: String, message: String },

    /// Duplicate field name
    #[error("Duplicate field name: '{field}' already exists in '{data_point}'")]
    DuplicateField { data_point: String, field: String },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization / Configuration Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Definition file could not be interpreted
    #[error("Invalid definition file: {0}")]
    InvalidDefinition(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl ScaffoldError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ScaffoldError::Validation(msg.into())
    }

    /// Create a DataPoint validation error
    pub fn data_point_validation(data_point: impl Into<String>, msg: impl Into<String>) -> Self {
        ScaffoldError::DataPointValidation {
            data_point: data_point.into(),
            message: msg.into(),
        }
    }

    /// Create a malformed shorthand error
    pub fn malformed(input: impl Into<String>, expected: impl Into<String>) -> Self {
        ScaffoldError::MalformedShorthand {
            input: input.into(),
            expected: expected.into(),
        }
    }

    /// Create an unsupported relationship error
    pub fn unsupported_relationship(
        relation: impl std::fmt::Display,
        data_point: impl Into<String>,
    ) -> Self {
        ScaffoldError::UnsupportedRelationship {
            relation: relation.to_string(),
            data_point: data_point.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        ScaffoldError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        ScaffoldError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error came from parsing user input
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            ScaffoldError::MalformedShorthand { .. }
                | ScaffoldError::UnknownRelationType(_)
                | ScaffoldError::UnknownControllerType(_)
        )
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScaffoldError::Validation(_)
                | ScaffoldError::DataPointValidation { .. }
                | ScaffoldError::DuplicateField { .. }
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ScaffoldError::Io(_)
                | ScaffoldError::FileRead { .. }
                | ScaffoldError::FileWrite { .. }
                | ScaffoldError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using ScaffoldError
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> ScaffoldResult<T>;
}

impl<T, E: Into<ScaffoldError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> ScaffoldResult<T> {
        self.map_err(|e| {
            let err: ScaffoldError = e.into();
            ScaffoldError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
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
    fn test_malformed_shorthand() {
        let err = ScaffoldError::malformed("title", "name:type");
        assert!(err.is_parse());
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "Malformed shorthand 'title': expected name:type"
        );
    }

    #[test]
    fn test_unsupported_relationship() {
        let err = ScaffoldError::unsupported_relationship("morphByMany", "Tag");
        assert!(!err.is_parse());
        assert_eq!(
            err.to_string(),
            "Unsupported relationship type 'morphByMany' on 'Tag'"
        );
    }

    #[test]
    fn test_data_point_validation_error() {
        let err = ScaffoldError::data_point_validation("Post", "name cannot be empty");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "DataPoint validation failed for 'Post': name cannot be empty"
        );
    }

    #[test]
    fn test_duplicate_field() {
        let err = ScaffoldError::DuplicateField {
            data_point: "Post".to_string(),
            field: "title".to_string(),
        };
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Duplicate field name: 'title' already exists in 'Post'"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = ScaffoldError::with_context("Writing artifacts", "Permission denied");
        assert_eq!(err.to_string(), "Writing artifacts: Permission denied");
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ScaffoldError = io_err.into();
        assert!(err.is_io());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_result_ext_wraps_message() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.with_context("Loading definition").unwrap_err();
        assert_eq!(err.to_string(), "Loading definition: IO error: missing");
    }
}
