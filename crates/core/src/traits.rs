//! Core traits for DataPoints

use crate::error::ScaffoldResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can check their own consistency
///
/// Generation never calls this: generators are lenient and produce output
/// for whatever they are given. Validation is an opt-in lint surfaced by
/// callers that want it.
///
/// # Example
///
/// ```rust,ignore
/// use datapoints_core::{ScaffoldError, ScaffoldResult, Validatable};
///
/// struct Column {
///     name: String,
/// }
///
/// impl Validatable for Column {
///     fn validate(&self) -> ScaffoldResult<()> {
///         if self.name.is_empty() {
///             return Err(ScaffoldError::validation("Column name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or the first problem found.
    fn validate(&self) -> ScaffoldResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
