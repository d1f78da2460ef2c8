//! # DataPoints IR
//!
//! The in-memory entity model consumed by every generator.
//!
//! ## Core Concepts
//!
//! - **DataPoint**: an entity to scaffold (e.g. Post, Comment)
//! - **Field**: a typed attribute of a DataPoint (e.g. title: string)
//! - **Relationship**: an association to another entity (belongsTo, hasMany, morph*)
//! - **TemplateOptions**: the resolved options threaded through every generator
//! - **Template**: a named preset of DataPoints plus default options
//!

// Module declarations
pub mod data_point;
pub mod definition;
pub mod field;
pub mod naming;
pub mod options;
pub mod relationship;
pub mod template;

// Re-export commonly used types at crate root
pub use data_point::{DataPoint, DataPointChanges};
pub use definition::{DefinitionFile, load_definition, save_definition};
pub use field::{DefaultValue, Field, FieldOptions, KNOWN_FIELD_TYPES};
pub use options::{OptionOverrides, TemplateOptions};
pub use relationship::{Relationship, RelationshipOptions};
pub use template::{BlogTemplate, Template, TemplateRegistry};

// Re-export core types that are commonly used with the IR
pub use datapoints_core::{
    ControllerType, RelationType, ScaffoldError, ScaffoldResult, Validatable,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        ControllerType, DataPoint, Field, OptionOverrides, RelationType, Relationship,
        ScaffoldError, ScaffoldResult, Template, TemplateOptions, TemplateRegistry,
    };
}
