//! DataPoint: the entity descriptor every generator consumes
//!
//! A `DataPoint` is immutable once built. Every "modification" goes through
//! [`DataPoint::with`] and returns a new value, so a collection can be shared
//! by any number of generators without coordination.

use crate::field::Field;
use crate::naming;
use crate::relationship::Relationship;
use datapoints_core::{ScaffoldError, ScaffoldResult, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// DataPoint
// ============================================================================

/// A business entity to scaffold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    name: String,

    #[serde(default)]
    fields: Vec<Field>,

    #[serde(default)]
    relationships: Vec<Relationship>,

    #[serde(default = "default_timestamps")]
    has_timestamps: bool,

    /// Fully-qualified trait names mixed into the model
    #[serde(default)]
    additional_traits: BTreeSet<String>,

    /// Fully-qualified interface names implemented by the model
    #[serde(default)]
    additional_interfaces: BTreeSet<String>,
}

fn default_timestamps() -> bool {
    true
}

/// A partial update applied by [`DataPoint::with`]; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct DataPointChanges {
    pub name: Option<String>,
    pub fields: Option<Vec<Field>>,
    pub relationships: Option<Vec<Relationship>>,
    pub has_timestamps: Option<bool>,
    pub additional_traits: Option<BTreeSet<String>>,
    pub additional_interfaces: Option<BTreeSet<String>>,
}

impl DataPoint {
    /// Create an empty DataPoint with timestamps enabled
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
            has_timestamps: true,
            additional_traits: BTreeSet::new(),
            additional_interfaces: BTreeSet::new(),
        }
    }

    /// Return a copy with `changes` applied
    pub fn with(&self, changes: DataPointChanges) -> Self {
        Self {
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            fields: changes.fields.unwrap_or_else(|| self.fields.clone()),
            relationships: changes
                .relationships
                .unwrap_or_else(|| self.relationships.clone()),
            has_timestamps: changes.has_timestamps.unwrap_or(self.has_timestamps),
            additional_traits: changes
                .additional_traits
                .unwrap_or_else(|| self.additional_traits.clone()),
            additional_interfaces: changes
                .additional_interfaces
                .unwrap_or_else(|| self.additional_interfaces.clone()),
        }
    }

    // ====================================================================
    // Composition
    // ====================================================================

    pub fn add_field(&self, field: Field) -> Self {
        let mut fields = self.fields.clone();
        fields.push(field);
        self.with(DataPointChanges {
            fields: Some(fields),
            ..Default::default()
        })
    }

    pub fn add_relationship(&self, relationship: Relationship) -> Self {
        let mut relationships = self.relationships.clone();
        relationships.push(relationship);
        self.with(DataPointChanges {
            relationships: Some(relationships),
            ..Default::default()
        })
    }

    /// Mix a trait into the generated model
    pub fn uses(&self, trait_name: impl Into<String>) -> Self {
        let mut traits = self.additional_traits.clone();
        traits.insert(trait_name.into());
        self.with(DataPointChanges {
            additional_traits: Some(traits),
            ..Default::default()
        })
    }

    /// Declare an interface on the generated model
    pub fn implements(&self, interface: impl Into<String>) -> Self {
        let mut interfaces = self.additional_interfaces.clone();
        interfaces.insert(interface.into());
        self.with(DataPointChanges {
            additional_interfaces: Some(interfaces),
            ..Default::default()
        })
    }

    pub fn without_timestamps(&self) -> Self {
        self.with(DataPointChanges {
            has_timestamps: Some(false),
            ..Default::default()
        })
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn has_timestamps(&self) -> bool {
        self.has_timestamps
    }

    pub fn additional_traits(&self) -> &BTreeSet<String> {
        &self.additional_traits
    }

    pub fn additional_interfaces(&self) -> &BTreeSet<String> {
        &self.additional_interfaces
    }

    // ====================================================================
    // Derived names
    // ====================================================================

    /// Singular StudlyCase class name (`posts` -> `Post`)
    pub fn model_name(&self) -> String {
        naming::model_name(&self.name)
    }

    /// Plural snake_case table name (`BlogPost` -> `blog_posts`)
    pub fn table_name(&self) -> String {
        naming::table_name(&self.name)
    }

    /// camelCase variable name for a single instance (`$blogPost`)
    pub fn variable_name(&self) -> String {
        naming::camel(&self.model_name())
    }

    /// snake_case singular name used for views, routes and route parameters
    pub fn route_key(&self) -> String {
        naming::snake(&self.model_name())
    }

    // ====================================================================
    // Relationship queries
    // ====================================================================

    /// Relationships with a distinct accessor name, first occurrence wins
    pub fn distinct_relationships(&self) -> Vec<&Relationship> {
        let mut seen = HashSet::new();
        self.relationships
            .iter()
            .filter(|r| seen.insert(r.accessor_name()))
            .collect()
    }

    /// Distinct `belongsTo` relationships, in declaration order
    pub fn belongs_to(&self) -> Vec<&Relationship> {
        self.distinct_relationships()
            .into_iter()
            .filter(|r| r.is_belongs_to())
            .collect()
    }

    /// Model names this DataPoint depends on through `belongsTo`
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for rel in self.belongs_to() {
            let model = rel.related_model();
            if !deps.contains(&model) {
                deps.push(model);
            }
        }
        deps
    }

    /// Number of relationships dropped by [`Self::distinct_relationships`]
    pub fn duplicate_relationship_count(&self) -> usize {
        self.relationships.len() - self.distinct_relationships().len()
    }
}

// ============================================================================
// Validation
// ============================================================================

impl Validatable for DataPoint {
    fn validate(&self) -> ScaffoldResult<()> {
        if self.name.trim().is_empty() {
            return Err(ScaffoldError::validation("DataPoint name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(ScaffoldError::data_point_validation(
                    &self.name,
                    "field name cannot be empty",
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ScaffoldError::DuplicateField {
                    data_point: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        for rel in &self.relationships {
            if rel.related.trim().is_empty() {
                return Err(ScaffoldError::data_point_validation(
                    &self.name,
                    format!("{} relationship has no related entity", rel.relation_type),
                ));
            }
        }

        Ok(())
    }

    fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("DataPoint name cannot be empty".to_string());
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                errors.push(format!("{}: field name cannot be empty", self.name));
            } else if !seen.insert(field.name.as_str()) {
                errors.push(format!("{}: duplicate field '{}'", self.name, field.name));
            }
        }

        for rel in &self.relationships {
            if rel.related.trim().is_empty() {
                errors.push(format!(
                    "{}: {} relationship has no related entity",
                    self.name, rel.relation_type
                ));
            }
        }

        let duplicates = self.duplicate_relationship_count();
        if duplicates > 0 {
            errors.push(format!(
                "{}: {} relationship(s) share an accessor name and will be skipped",
                self.name, duplicates
            ));
        }

        errors
    }
}

// ============================================================================
// Tests
// ============================================================================
