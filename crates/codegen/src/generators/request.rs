//! # Request Generator
//!
//! Paired `Store{Model}Request` / `Update{Model}Request` form requests.
//!
//! Store rules come from the type table below, adjusted by column
//! modifiers, unless the field carries explicit `rules`. Update rules are
//! the store rules with `required` relaxed to `sometimes` and `unique:`
//! rules ignoring the record being updated. Conditional rules such as
//! `required_if` and per-item rules are carried over unchanged.

use super::{Generator, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::paths::{REQUEST_NAMESPACE, resolve};
use crate::php::{Method, PhpClass, PhpFile, PhpValue, quote};
use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, Field, Relationship, TemplateOptions, naming};

const FORM_REQUEST: &str = "Illuminate\\Foundation\\Http\\FormRequest";
const RULE: &str = "Illuminate\\Validation\\Rule";

/// Generates store and update form requests
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestGenerator;

impl Generator for RequestGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Request
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        let paths = resolve(options);
        let mut artifacts = Vec::with_capacity(data_points.len() * 2);

        for dp in data_points {
            let rules = store_rules(dp);
            for action in [Action::Store, Action::Update] {
                let class = format!("{}{}Request", action.prefix(), dp.model_name());
                artifacts.push(php_artifact(
                    paths.class_path(REQUEST_NAMESPACE, &class),
                    ArtifactKind::Request,
                    build_request(dp, &class, &rules, action),
                ));
            }
        }

        Ok(artifacts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Store,
    Update,
}

impl Action {
    fn prefix(&self) -> &'static str {
        match self {
            Action::Store => "Store",
            Action::Update => "Update",
        }
    }
}

// ============================================================================
// Rule Table
// ============================================================================

/// Default validation rules for a field type
pub fn type_rules(field_type: &str) -> Vec<&'static str> {
    match field_type {
        "string" => vec!["required", "string", "max:255"],
        "text" => vec!["required", "string"],
        "integer" | "bigInteger" => vec!["required", "integer"],
        "float" | "decimal" => vec!["required", "numeric"],
        "boolean" => vec!["required", "boolean"],
        "date" | "datetime" | "timestamp" => vec!["required", "date"],
        "time" => vec!["required", "date_format:H:i:s"],
        "year" => vec!["required", "date_format:Y"],
        "email" => vec!["required", "email"],
        "url" => vec!["required", "url"],
        "password" => vec!["required", "string", "min:8"],
        "uuid" => vec!["required", "uuid"],
        "ip" => vec!["required", "ip"],
        "json" => vec!["required", "json"],
        _ => vec!["required"],
    }
}

/// One key of the rules array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub key: String,
    pub rules: Vec<String>,
    /// Whether the update request relaxes these rules
    pub relax_on_update: bool,
}

impl RuleEntry {
    fn new(key: impl Into<String>, rules: Vec<String>) -> Self {
        Self {
            key: key.into(),
            rules,
            relax_on_update: true,
        }
    }

    fn per_item(key: impl Into<String>, rules: Vec<String>) -> Self {
        Self {
            relax_on_update: false,
            ..Self::new(key, rules)
        }
    }
}

fn field_rules(field: &Field, table: &str) -> Vec<String> {
    if let Some(rules) = &field.options.rules {
        return rules.clone();
    }

    let opts = &field.options;
    let mut rules: Vec<String> = type_rules(&field.field_type)
        .into_iter()
        .map(|rule| match rule {
            "required" if opts.nullable => "nullable".to_string(),
            "max:255" => opts
                .length
                .map_or_else(|| rule.to_string(), |len| format!("max:{}", len)),
            other => other.to_string(),
        })
        .collect();
    if opts.unique {
        rules.push(format!("unique:{},{}", table, field.name));
    }
    rules
}

fn relationship_rules(rel: &Relationship) -> Vec<RuleEntry> {
    let table = rel.related_table();
    let exists = format!("exists:{},id", table);

    if rel.is_belongs_to() {
        let rules = rel
            .options
            .rules
            .clone()
            .unwrap_or_else(|| vec!["required".to_string(), exists]);
        return vec![RuleEntry::new(rel.foreign_key(), rules)];
    }

    if rel.requires_pivot_table() {
        let key = naming::plural(&rel.related);
        let rules = rel
            .options
            .rules
            .clone()
            .unwrap_or_else(|| vec!["array".to_string()]);
        let items = rel.options.item_rules.clone().unwrap_or_else(|| vec![exists]);
        return vec![
            RuleEntry::new(key.clone(), rules),
            RuleEntry::per_item(format!("{}.*", key), items),
        ];
    }

    Vec::new()
}

/// Rules of the store request, in field then relationship order
pub fn store_rules(dp: &DataPoint) -> Vec<RuleEntry> {
    let table = dp.table_name();
    let relationships = dp.distinct_relationships();
    let relation_entries: Vec<RuleEntry> = relationships
        .iter()
        .flat_map(|rel| relationship_rules(rel))
        .collect();

    let mut entries = Vec::new();
    for field in dp.fields() {
        // relationship keys carry their own rules
        if relation_entries.iter().any(|e| e.key == field.name) {
            continue;
        }
        entries.push(RuleEntry::new(field.name.clone(), field_rules(field, &table)));
        for (key, rules) in &field.options.nested_rules {
            entries.push(RuleEntry::new(format!("{}.{}", field.name, key), rules.clone()));
        }
    }
    entries.extend(relation_entries);
    entries
}

/// Rewrite one store rule for the update request
fn update_rule(rule: &str, key: &str, route_key: &str, file: &mut PhpFile) -> PhpValue {
    if rule == "required" {
        return PhpValue::str("sometimes");
    }

    if let Some(target) = rule.strip_prefix("unique:") {
        let parts: Vec<&str> = target.split(',').collect();
        // already ignoring a specific id
        if parts.len() > 2 {
            return PhpValue::str(rule);
        }
        let column = parts
            .get(1)
            .map(|c| c.to_string())
            .unwrap_or_else(|| key.to_string());
        let rule_class = file.import(RULE);
        return PhpValue::raw(format!(
            "{}::unique({}, {})->ignore($this->route({}))",
            rule_class,
            quote(parts[0]),
            quote(&column),
            quote(route_key)
        ));
    }

    PhpValue::str(rule)
}

// ============================================================================
// Request File
// ============================================================================

fn build_request(dp: &DataPoint, class: &str, rules: &[RuleEntry], action: Action) -> PhpFile {
    let mut file = PhpFile::new(REQUEST_NAMESPACE, PhpClass::new(class));
    let base = file.import(FORM_REQUEST);
    file.class.extends = Some(base);

    let route_key = dp.route_key();
    let mut map: Vec<(String, PhpValue)> = Vec::with_capacity(rules.len());
    for entry in rules {
        let values = entry
            .rules
            .iter()
            .map(|rule| match action {
                Action::Update if entry.relax_on_update => {
                    update_rule(rule, &entry.key, &route_key, &mut file)
                }
                _ => PhpValue::str(rule.clone()),
            })
            .collect();
        map.push((entry.key.clone(), PhpValue::Inline(values)));
    }

    file.class.method(
        Method::public("authorize")
            .returns("bool")
            .line("return true;"),
    );
    file.class.method(
        Method::public("rules")
            .returns("array")
            .line(format!("return {};", PhpValue::str_map(map).render())),
    );
    file
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use datapoints_core::RelationType;
    use pretty_assertions::assert_eq;

    fn generate(dp: DataPoint) -> (String, String) {
        let artifacts = RequestGenerator
            .generate(&[dp], &TemplateOptions::default())
            .unwrap();
        assert_eq!(artifacts.len(), 2);
        (
            artifacts[0].content().to_string(),
            artifacts[1].content().to_string(),
        )
    }

    #[test]
    fn test_store_and_update_golden() {
        let (store, update) = generate(DataPoint::new("Post").add_field(Field::new("title", "string")));

        let expected_store = r"<?php

namespace App\Http\Requests;

use Illuminate\Foundation\Http\FormRequest;

class StorePostRequest extends FormRequest
{
    public function authorize(): bool
    {
        return true;
    }

    public function rules(): array
    {
        return [
            'title' => ['required', 'string', 'max:255'],
        ];
    }
}
";
        assert_eq!(store, expected_store);
        assert_eq!(
            update,
            expected_store
                .replace("StorePostRequest", "UpdatePostRequest")
                .replace("['required',", "['sometimes',")
        );
    }

    #[test]
    fn test_unique_ignores_current_record_on_update() {
        let (store, update) = generate(
            DataPoint::new("Post").add_field(Field::new("slug", "string").unique()),
        );
        assert!(store.contains("'slug' => ['required', 'string', 'max:255', 'unique:posts,slug'],"));
        assert!(update.contains(
            "'slug' => ['sometimes', 'string', 'max:255', Rule::unique('posts', 'slug')->ignore($this->route('post'))],"
        ));
        assert!(update.contains("use Illuminate\\Validation\\Rule;"));
        assert!(!store.contains("use Illuminate\\Validation\\Rule;"));
    }

    #[test]
    fn test_unique_without_column_uses_key() {
        let (_, update) = generate(
            DataPoint::new("User").add_field(Field::new("email", "email").with_rules(["required", "unique:users"])),
        );
        assert!(update.contains(
            "'email' => ['sometimes', Rule::unique('users', 'email')->ignore($this->route('user'))],"
        ));
    }

    #[test]
    fn test_conditional_rules_not_relaxed() {
        let (_, update) = generate(
            DataPoint::new("Post").add_field(
                Field::new("published_at", "timestamp").with_rules(["required_if:status,published", "date"]),
            ),
        );
        assert!(update.contains("'published_at' => ['required_if:status,published', 'date'],"));
    }

    #[test]
    fn test_modifiers_adjust_defaults() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("subtitle", "string").nullable().with_length(80))
            .add_field(Field::new("flag", "exotic"));
        let rules = store_rules(&dp);
        assert_eq!(rules[0].rules, vec!["nullable", "string", "max:80"]);
        assert_eq!(rules[1].rules, vec!["required"]);
    }

    #[test]
    fn test_nested_rules() {
        let dp = DataPoint::new("Post").add_field(
            Field::new("meta", "json")
                .with_nested_rules("title", ["required", "string"])
                .with_nested_rules("author", ["nullable", "string"]),
        );
        let keys: Vec<String> = store_rules(&dp).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["meta", "meta.title", "meta.author"]);
    }

    #[test]
    fn test_nested_rules_from_definition_keep_order() {
        let definition = datapoints_ir::DefinitionFile::from_json(
            r#"{"dataPoints":[{"name":"Post","fields":[{"name":"metadata","type":"json","options":{"nested_rules":{"title":["required","string"],"description":["nullable","string"]}}}]}]}"#,
        )
        .unwrap();
        let keys: Vec<String> = store_rules(&definition.data_points[0])
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["metadata", "metadata.title", "metadata.description"]);
    }

    #[test]
    fn test_relationship_rules() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("title", "string"))
            .add_relationship(Relationship::belongs_to("Category"))
            .add_relationship(Relationship::belongs_to_many("Tag"))
            .add_relationship(Relationship::has_many("Comment"));
        let (store, update) = generate(dp);

        assert!(store.contains("'category_id' => ['required', 'exists:categories,id'],"));
        assert!(store.contains("'tags' => ['array'],"));
        assert!(store.contains("'tags.*' => ['exists:tags,id'],"));
        assert!(!store.contains("comments"));

        assert!(update.contains("'category_id' => ['sometimes', 'exists:categories,id'],"));
        assert!(update.contains("'tags.*' => ['exists:tags,id'],"));
    }

    #[test]
    fn test_item_rules_kept_on_update() {
        let dp = DataPoint::new("Post").add_relationship(
            Relationship::new(RelationType::MorphToMany, "Tag")
                .with_rules(["required", "array"])
                .with_item_rules(["required", "integer"]),
        );
        let (_, update) = generate(dp);
        assert!(update.contains("'tags' => ['sometimes', 'array'],"));
        assert!(update.contains("'tags.*' => ['required', 'integer'],"));
    }

    #[test]
    fn test_foreign_key_field_uses_relationship_rules() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("user_id", "bigInteger"))
            .add_relationship(Relationship::belongs_to("User"));
        let rules = store_rules(&dp);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].rules, vec!["required", "exists:users,id"]);
    }

    #[test]
    fn test_paths() {
        let artifacts = RequestGenerator
            .generate(&[DataPoint::new("Post")], &TemplateOptions::default())
            .unwrap();
        assert_eq!(artifacts[0].file_name(), "StorePostRequest.php");
        assert_eq!(
            artifacts[1].path(),
            std::path::Path::new("./app/Http/Requests/UpdatePostRequest.php")
        );
    }
}
