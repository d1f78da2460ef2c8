//! Field definitions for DataPoints
//!
//! A `Field` is one typed attribute: a storage column on the migration side
//! and a property on the model side. The type is an open string; generators
//! look it up in their own tables and fall back to a pass-through shape for
//! types they do not know.

use datapoints_core::{ScaffoldError, ScaffoldResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field types every generator has an entry for
pub const KNOWN_FIELD_TYPES: &[&str] = &[
    "string",
    "text",
    "integer",
    "bigInteger",
    "float",
    "decimal",
    "boolean",
    "date",
    "datetime",
    "timestamp",
    "time",
    "year",
    "email",
    "url",
    "password",
    "uuid",
    "ip",
    "json",
];

// ============================================================================
// Field
// ============================================================================

/// A single attribute of a DataPoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column / property name (snake_case)
    pub name: String,

    /// Type key, e.g. "string", "decimal" or any custom column type
    #[serde(rename = "type")]
    pub field_type: String,

    /// Column modifiers and generator-specific overrides
    #[serde(default)]
    pub options: FieldOptions,
}

impl Field {
    /// Create a field with default options
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            options: FieldOptions::default(),
        }
    }

    /// Parse `name:type[:modifier...]`
    ///
    /// Modifiers are `nullable`, `unique` and `length=N`.
    pub fn parse_shorthand(input: &str) -> ScaffoldResult<Self> {
        const EXPECTED: &str = "name:type[:nullable|:unique|:length=N]";

        let mut parts = input.trim().split(':');
        let name = parts.next().unwrap_or_default().trim();
        let field_type = parts.next().map(str::trim).unwrap_or_default();

        if name.is_empty() || field_type.is_empty() {
            return Err(ScaffoldError::malformed(input, EXPECTED));
        }

        let mut field = Field::new(name, field_type);
        for modifier in parts {
            field = match modifier.trim() {
                "nullable" => field.nullable(),
                "unique" => field.unique(),
                other => match other.strip_prefix("length=").map(str::parse::<u32>) {
                    Some(Ok(length)) => field.with_length(length),
                    _ => return Err(ScaffoldError::malformed(input, EXPECTED)),
                },
            };
        }

        Ok(field)
    }

    // ====================================================================
    // Builder
    // ====================================================================

    pub fn nullable(mut self) -> Self {
        self.options.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.options.unique = true;
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.options.length = Some(length);
        self
    }

    pub fn with_default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.options.comment = Some(comment.into());
        self
    }

    /// Override the model cast for this field
    pub fn with_cast(mut self, cast: impl Into<String>) -> Self {
        self.options.cast = Some(cast.into());
        self
    }

    /// Hide the attribute from model serialization
    pub fn hidden(mut self) -> Self {
        self.options.hidden = true;
        self
    }

    /// Append a computed accessor for this attribute
    pub fn appended(mut self) -> Self {
        self.options.appends = true;
        self
    }

    /// Replace the default validation rules
    pub fn with_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    /// Add rules for `name.key`
    pub fn with_nested_rules<I, S>(mut self, key: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options
            .nested_rules
            .insert(key.into(), rules.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the factory expression (called on `fake()`)
    pub fn with_faker(mut self, expression: impl Into<String>) -> Self {
        self.options.faker = Some(expression.into());
        self
    }

    // ====================================================================
    // Queries
    // ====================================================================

    /// Whether the type is one every generator knows
    pub fn is_known_type(&self) -> bool {
        KNOWN_FIELD_TYPES.contains(&self.field_type.as_str())
    }
}

// ============================================================================
// FieldOptions
// ============================================================================

/// Column modifiers plus the keys consumed by individual generators
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub nullable: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Model cast, replacing the type-derived one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
    /// Listed in the model's `$hidden`
    pub hidden: bool,
    /// Listed in the model's `$appends`, with an accessor
    pub appends: bool,
    /// Validation rules, replacing the type-derived ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
    /// Validation rules for `field.key` entries, in declaration order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub nested_rules: IndexMap<String, Vec<String>>,
    /// Faker formatter, replacing the type-derived one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faker: Option<String>,
}

// ============================================================================
// DefaultValue
// ============================================================================

/// A column default, kept typed so generators can render it as a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Int(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
