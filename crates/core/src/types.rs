//! Closed vocabularies shared by the entity model and the generators
//!
//! `RelationType` and `ControllerType` carry every classification the
//! generators branch on, so that no generator re-derives them inline.

use crate::error::ScaffoldError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Relation Types
// ============================================================================

/// Eloquent association shapes a DataPoint can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    HasOne,
    HasMany,
    BelongsTo,
    BelongsToMany,
    MorphOne,
    MorphMany,
    MorphTo,
    MorphToMany,
    MorphByMany,
}

/// How a relation type is expressed on the generated model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationShape {
    /// Builder method called inside the accessor (`$this->hasMany(...)`)
    pub method: &'static str,
    /// Short name of the Eloquent relation class returned by the accessor
    pub class: &'static str,
    /// Whether the accessor yields a collection
    pub to_many: bool,
}

/// Namespace holding every Eloquent relation class
pub const RELATIONS_NAMESPACE: &str = "Illuminate\\Database\\Eloquent\\Relations";

impl RelationType {
    /// Canonical name, as written in shorthand and definition files
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasOne => "hasOne",
            RelationType::HasMany => "hasMany",
            RelationType::BelongsTo => "belongsTo",
            RelationType::BelongsToMany => "belongsToMany",
            RelationType::MorphOne => "morphOne",
            RelationType::MorphMany => "morphMany",
            RelationType::MorphTo => "morphTo",
            RelationType::MorphToMany => "morphToMany",
            RelationType::MorphByMany => "morphByMany",
        }
    }

    /// The accessor shape for this relation type
    pub fn shape(&self) -> RelationShape {
        let (method, class, to_many) = match self {
            RelationType::HasOne => ("hasOne", "HasOne", false),
            RelationType::HasMany => ("hasMany", "HasMany", true),
            RelationType::BelongsTo => ("belongsTo", "BelongsTo", false),
            RelationType::BelongsToMany => ("belongsToMany", "BelongsToMany", true),
            RelationType::MorphOne => ("morphOne", "MorphOne", false),
            RelationType::MorphMany => ("morphMany", "MorphMany", true),
            RelationType::MorphTo => ("morphTo", "MorphTo", false),
            RelationType::MorphToMany => ("morphToMany", "MorphToMany", true),
            RelationType::MorphByMany => ("morphedByMany", "MorphToMany", true),
        };
        RelationShape {
            method,
            class,
            to_many,
        }
    }

    /// Fully-qualified name of the relation class
    pub fn relation_import(&self) -> String {
        format!("{}\\{}", RELATIONS_NAMESPACE, self.shape().class)
    }

    /// Whether the accessor yields a collection
    pub fn is_to_many(&self) -> bool {
        self.shape().to_many
    }

    /// True for every morph* variant
    pub fn is_polymorphic(&self) -> bool {
        matches!(
            self,
            RelationType::MorphOne
                | RelationType::MorphMany
                | RelationType::MorphTo
                | RelationType::MorphToMany
                | RelationType::MorphByMany
        )
    }

    /// True when the association is stored in an intermediate table
    pub fn requires_pivot_table(&self) -> bool {
        matches!(
            self,
            RelationType::BelongsToMany | RelationType::MorphToMany | RelationType::MorphByMany
        )
    }

    /// The many-to-one edge: owner holds the foreign key and depends on the related entity
    pub fn is_belongs_to(&self) -> bool {
        matches!(self, RelationType::BelongsTo)
    }

    /// False only for `morphTo`, whose related side is a morph name rather than a model
    pub fn has_related_model(&self) -> bool {
        !matches!(self, RelationType::MorphTo)
    }

    /// Get all relation types
    pub fn all() -> &'static [RelationType] {
        &[
            RelationType::HasOne,
            RelationType::HasMany,
            RelationType::BelongsTo,
            RelationType::BelongsToMany,
            RelationType::MorphOne,
            RelationType::MorphMany,
            RelationType::MorphTo,
            RelationType::MorphToMany,
            RelationType::MorphByMany,
        ]
    }
}

impl FromStr for RelationType {
    type Err = ScaffoldError;

    /// Accepts `belongsTo`, `belongs_to`, `belongs-to` and `BelongsTo` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        RelationType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().to_ascii_lowercase() == key)
            .or_else(|| (key == "morphedbymany").then_some(RelationType::MorphByMany))
            .ok_or_else(|| ScaffoldError::UnknownRelationType(s.to_string()))
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Controller Types
// ============================================================================

/// Which controller flavour to scaffold, and which companions it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerType {
    /// No controller at all
    #[default]
    None,
    /// JSON API resource controller
    #[serde(alias = "api-resource")]
    Api,
    /// Server-rendered resource controller
    #[serde(alias = "resource")]
    Web,
    /// Single-action controller
    #[serde(alias = "empty")]
    Invokable,
}

impl ControllerType {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerType::None => "none",
            ControllerType::Api => "api",
            ControllerType::Web => "web",
            ControllerType::Invokable => "invokable",
        }
    }

    /// Human-readable label for prompts
    pub fn label(&self) -> &'static str {
        match self {
            ControllerType::None => "No controller",
            ControllerType::Api => "API resource controller",
            ControllerType::Web => "Web resource controller",
            ControllerType::Invokable => "Invokable controller",
        }
    }

    pub fn generates_controller(&self) -> bool {
        !matches!(self, ControllerType::None)
    }

    pub fn requires_requests(&self) -> bool {
        matches!(self, ControllerType::Api | ControllerType::Web)
    }

    pub fn requires_resources(&self) -> bool {
        matches!(self, ControllerType::Api)
    }

    pub fn requires_views(&self) -> bool {
        matches!(self, ControllerType::Web | ControllerType::Invokable)
    }

    /// Get all controller types
    pub fn all() -> &'static [ControllerType] {
        &[
            ControllerType::None,
            ControllerType::Api,
            ControllerType::Web,
            ControllerType::Invokable,
        ]
    }
}

impl FromStr for ControllerType {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(ControllerType::None),
            "api" | "api-resource" => Ok(ControllerType::Api),
            "web" | "resource" => Ok(ControllerType::Web),
            "invokable" | "empty" => Ok(ControllerType::Invokable),
            _ => Err(ScaffoldError::UnknownControllerType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ControllerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
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
    fn test_relation_type_parse_variants() {
        assert_eq!(
            "belongsTo".parse::<RelationType>().unwrap(),
            RelationType::BelongsTo
        );
        assert_eq!(
            "belongs_to".parse::<RelationType>().unwrap(),
            RelationType::BelongsTo
        );
        assert_eq!(
            "HasMany".parse::<RelationType>().unwrap(),
            RelationType::HasMany
        );
        assert_eq!(
            "morphedByMany".parse::<RelationType>().unwrap(),
            RelationType::MorphByMany
        );
    }

    #[test]
    fn test_relation_type_parse_unknown() {
        let err = "ownsMany".parse::<RelationType>().unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_relation_type_round_trips_through_display() {
        for t in RelationType::all() {
            assert_eq!(t.to_string().parse::<RelationType>().unwrap(), *t);
        }
    }

    #[test]
    fn test_shape_table() {
        let shape = RelationType::MorphByMany.shape();
        assert_eq!(shape.method, "morphedByMany");
        assert_eq!(shape.class, "MorphToMany");
        assert!(shape.to_many);

        assert!(!RelationType::BelongsTo.is_to_many());
        assert!(RelationType::HasMany.is_to_many());
        assert_eq!(
            RelationType::HasMany.relation_import(),
            "Illuminate\\Database\\Eloquent\\Relations\\HasMany"
        );
    }

    #[test]
    fn test_predicates() {
        let polymorphic: Vec<_> = RelationType::all()
            .iter()
            .filter(|t| t.is_polymorphic())
            .collect();
        assert_eq!(polymorphic.len(), 5);

        let pivot: Vec<_> = RelationType::all()
            .iter()
            .filter(|t| t.requires_pivot_table())
            .copied()
            .collect();
        assert_eq!(
            pivot,
            vec![
                RelationType::BelongsToMany,
                RelationType::MorphToMany,
                RelationType::MorphByMany
            ]
        );

        assert!(!RelationType::MorphTo.has_related_model());
        assert!(RelationType::MorphOne.has_related_model());
    }

    #[test]
    fn test_relation_type_serde() {
        let json = serde_json::to_string(&RelationType::BelongsToMany).unwrap();
        assert_eq!(json, "\"belongsToMany\"");
    }

    #[test]
    fn test_controller_capabilities() {
        assert!(!ControllerType::None.generates_controller());
        assert!(ControllerType::Api.requires_requests());
        assert!(ControllerType::Api.requires_resources());
        assert!(!ControllerType::Api.requires_views());
        assert!(ControllerType::Web.requires_requests());
        assert!(ControllerType::Web.requires_views());
        assert!(!ControllerType::Invokable.requires_requests());
        assert!(ControllerType::Invokable.requires_views());
    }

    #[test]
    fn test_controller_type_aliases() {
        assert_eq!(
            "api-resource".parse::<ControllerType>().unwrap(),
            ControllerType::Api
        );
        assert_eq!(
            "resource".parse::<ControllerType>().unwrap(),
            ControllerType::Web
        );
        assert!("livewire".parse::<ControllerType>().is_err());

        let parsed: ControllerType = serde_json::from_str("\"api-resource\"").unwrap();
        assert_eq!(parsed, ControllerType::Api);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"api\"");
    }
}
