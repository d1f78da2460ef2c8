//! Relationship definitions between DataPoints
//!
//! A `Relationship` is an edge from the owning DataPoint to another entity.
//! Everything a generator needs to know about the edge (accessor name, key
//! columns, morph columns) is derived here once.

use crate::naming;
use datapoints_core::{RelationType, ScaffoldError, ScaffoldResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// Relationship
// ============================================================================

/// An association from the owning DataPoint to `related`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Association shape
    #[serde(rename = "type")]
    pub relation_type: RelationType,

    /// Related entity name, or the morph name for `morphTo`
    pub related: String,

    /// Key and pivot overrides plus validation extensions
    #[serde(default)]
    pub options: RelationshipOptions,
}

impl Relationship {
    /// Create a relationship with default options
    pub fn new(relation_type: RelationType, related: impl Into<String>) -> Self {
        Self {
            relation_type,
            related: related.into(),
            options: RelationshipOptions::default(),
        }
    }

    pub fn has_one(related: impl Into<String>) -> Self {
        Self::new(RelationType::HasOne, related)
    }

    pub fn has_many(related: impl Into<String>) -> Self {
        Self::new(RelationType::HasMany, related)
    }

    pub fn belongs_to(related: impl Into<String>) -> Self {
        Self::new(RelationType::BelongsTo, related)
    }

    pub fn belongs_to_many(related: impl Into<String>) -> Self {
        Self::new(RelationType::BelongsToMany, related)
    }

    pub fn morph_to(name: impl Into<String>) -> Self {
        Self::new(RelationType::MorphTo, name)
    }

    /// Parse `type:Related`, e.g. `belongsTo:User`
    pub fn parse_shorthand(input: &str) -> ScaffoldResult<Self> {
        let (relation_type, related) = input
            .trim()
            .split_once(':')
            .map(|(t, r)| (t.trim(), r.trim()))
            .filter(|(t, r)| !t.is_empty() && !r.is_empty() && !r.contains(':'))
            .ok_or_else(|| ScaffoldError::malformed(input, "type:Related"))?;

        Ok(Self::new(relation_type.parse()?, related))
    }

    // ====================================================================
    // Builder
    // ====================================================================

    pub fn with_foreign_key(mut self, key: impl Into<String>) -> Self {
        self.options.foreign_key = Some(key.into());
        self
    }

    pub fn with_local_key(mut self, key: impl Into<String>) -> Self {
        self.options.local_key = Some(key.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.options.table = Some(table.into());
        self
    }

    pub fn with_morph_name(mut self, name: impl Into<String>) -> Self {
        self.options.morph_name = Some(name.into());
        self
    }

    pub fn with_pivot_timestamps(mut self) -> Self {
        self.options.with_timestamps = true;
        self
    }

    pub fn with_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_item_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.item_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    // ====================================================================
    // Derived properties
    // ====================================================================

    pub fn is_polymorphic(&self) -> bool {
        self.relation_type.is_polymorphic()
    }

    pub fn requires_pivot_table(&self) -> bool {
        self.relation_type.requires_pivot_table()
    }

    pub fn is_to_many(&self) -> bool {
        self.relation_type.is_to_many()
    }

    pub fn is_belongs_to(&self) -> bool {
        self.relation_type.is_belongs_to()
    }

    /// Class name of the related model (`comments` -> `Comment`)
    pub fn related_model(&self) -> String {
        naming::model_name(&self.related)
    }

    /// Related table name (`User` -> `users`)
    pub fn related_table(&self) -> String {
        naming::table_name(&self.related)
    }

    /// Name of the accessor method on the owning model
    ///
    /// To-many accessors are plural (`comments`), to-one accessors keep the
    /// related name (`user`, `commentable`).
    pub fn accessor_name(&self) -> String {
        if self.is_to_many() {
            naming::camel(&naming::plural(&self.related))
        } else {
            naming::camel(&self.related)
        }
    }

    /// Foreign key column: the explicit option, or `<snake(related)>_id`
    pub fn foreign_key(&self) -> String {
        self.options
            .foreign_key
            .clone()
            .unwrap_or_else(|| naming::foreign_key(&self.related))
    }

    /// Morph name: the explicit option, the related name for `morphTo`,
    /// or `<snake(related)>able` for the owning side
    pub fn morph_name(&self) -> String {
        if let Some(name) = &self.options.morph_name {
            return name.clone();
        }
        match self.relation_type {
            RelationType::MorphTo => naming::snake(&self.related),
            _ => format!("{}able", naming::singular(&self.related)),
        }
    }

    pub fn morph_type(&self) -> String {
        self.options
            .morph_type
            .clone()
            .unwrap_or_else(|| format!("{}_type", self.morph_name()))
    }

    pub fn morph_id(&self) -> String {
        self.options
            .morph_id
            .clone()
            .unwrap_or_else(|| format!("{}_id", self.morph_name()))
    }
}

// ============================================================================
// RelationshipOptions
// ============================================================================

/// Overrides for key columns, pivot tables and morph columns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationshipOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_key: Option<String>,
    /// Pivot table for many-to-many shapes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph_id: Option<String>,
    /// Maintain timestamps on the pivot table
    pub with_timestamps: bool,
    /// Validation rules for the relationship key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
    /// Validation rules applied to each item of a to-many key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_rules: Option<Vec<String>>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_shorthand() {
        let rel = Relationship::parse_shorthand("belongsTo:User").unwrap();
        assert_eq!(rel.relation_type, RelationType::BelongsTo);
        assert_eq!(rel.related, "User");
    }

    #[test]
    fn test_parse_shorthand_missing_delimiter() {
        let err = Relationship::parse_shorthand("belongsToUser").unwrap_err();
        assert!(matches!(err, ScaffoldError::MalformedShorthand { .. }));

        assert!(Relationship::parse_shorthand("belongsTo:").is_err());
        assert!(Relationship::parse_shorthand("belongsTo:User:extra").is_err());
    }

    #[test]
    fn test_parse_shorthand_unknown_type() {
        let err = Relationship::parse_shorthand("ownsMany:User").unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownRelationType(_)));
    }

    #[test]
    fn test_accessor_names() {
        assert_eq!(Relationship::belongs_to("User").accessor_name(), "user");
        assert_eq!(Relationship::has_many("Comment").accessor_name(), "comments");
        assert_eq!(
            Relationship::belongs_to_many("BlogTag").accessor_name(),
            "blogTags"
        );
        assert_eq!(
            Relationship::morph_to("commentable").accessor_name(),
            "commentable"
        );
    }

    #[test]
    fn test_foreign_key_default_and_override() {
        assert_eq!(Relationship::belongs_to("User").foreign_key(), "user_id");
        assert_eq!(
            Relationship::belongs_to("User")
                .with_foreign_key("author_id")
                .foreign_key(),
            "author_id"
        );
    }

    #[test]
    fn test_morph_columns() {
        let rel = Relationship::morph_to("commentable");
        assert_eq!(rel.morph_name(), "commentable");
        assert_eq!(rel.morph_type(), "commentable_type");
        assert_eq!(rel.morph_id(), "commentable_id");

        let owner_side = Relationship::new(RelationType::MorphMany, "Comment");
        assert_eq!(owner_side.morph_name(), "commentable");
    }

    #[test]
    fn test_options_json_keys() {
        let json = r#"{"type":"belongsToMany","related":"Tag","options":{"table":"post_tag","withTimestamps":true,"itemRules":["exists:tags,id"]}}"#;
        let rel: Relationship = serde_json::from_str(json).unwrap();
        assert!(rel.requires_pivot_table());
        assert_eq!(rel.options.table.as_deref(), Some("post_tag"));
        assert!(rel.options.with_timestamps);
        assert_eq!(
            rel.options.item_rules,
            Some(vec!["exists:tags,id".to_string()])
        );
    }
}
