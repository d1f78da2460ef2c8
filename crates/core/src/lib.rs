//! # DataPoints Core
//!
//! Core types, traits, and error handling for DataPoints.
//!
//! This crate provides the foundational building blocks used throughout
//! the scaffolder:
//!
//! - **Types**: the closed `RelationType` and `ControllerType` vocabularies
//!   with their capability tables
//! - **Traits**: `Validatable`
//! - **Errors**: Unified error handling with `ScaffoldError` and `ScaffoldResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ResultExt, ScaffoldError, ScaffoldResult};
pub use traits::Validatable;
pub use types::{ControllerType, RELATIONS_NAMESPACE, RelationShape, RelationType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
