//! DataPoints
//!
//! Entity-driven scaffolding for Laravel applications.
//!
//! This umbrella crate re-exports the library crates for embedding; the
//! `datapoints` command lives in `datapoints_cli`.
//!
//! ```rust,ignore
//! use datapoints::ir::{BlogTemplate, Template};
//! use datapoints::codegen::{FsSink, Pipeline};
//!
//! let options = BlogTemplate.default_options();
//! let points = BlogTemplate.data_points(&options);
//! let set = Pipeline::from_options(&options).run(&points, &options)?;
//! set.persist(&mut FsSink)?;
//! ```

pub use datapoints_codegen as codegen;
pub use datapoints_ir as ir;
pub use datapoints_core;

pub use datapoints_codegen::{GeneratedSet, Pipeline, generate};
pub use datapoints_core::{ScaffoldError, ScaffoldResult};
pub use datapoints_ir::{DataPoint, Field, Relationship, TemplateOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BlogTemplate, Template};

    #[test]
    fn test_blog_through_umbrella() {
        let options = BlogTemplate.default_options();
        let set = generate(&BlogTemplate.data_points(&options), &options).unwrap();
        assert!(set.find("Post.php").is_some());
        assert!(set.find("CommentController.php").is_some());
    }
}
