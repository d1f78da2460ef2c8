//! # Model Generator
//!
//! Generates one Eloquent model per DataPoint:
//!
//! - `$fillable` in field order
//! - `$casts` from the field type (or the `cast` option)
//! - `$hidden`, `$appends` and `$attributes` from field options
//! - one accessor per appended attribute
//! - one relationship method per distinct relationship

use super::{Generator, call_args, default_literal, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::paths::{ResolvedPaths, resolve};
use crate::php::{Method, PhpClass, PhpFile, PhpValue, Property};
use datapoints_core::{RelationType, ScaffoldError, ScaffoldResult};
use datapoints_ir::{DataPoint, Field, Relationship, TemplateOptions, naming};

const BASE_MODEL: &str = "Illuminate\\Database\\Eloquent\\Model";
const HAS_FACTORY: &str = "Illuminate\\Database\\Eloquent\\Factories\\HasFactory";

/// Generates Eloquent model classes
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelGenerator;

impl Generator for ModelGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Model
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        let paths = resolve(options);
        data_points
            .iter()
            .map(|dp| {
                let file = build_model(dp, &paths)?;
                Ok(php_artifact(
                    paths.model_path(&dp.model_name()),
                    ArtifactKind::Model,
                    file,
                ))
            })
            .collect()
    }
}

// ============================================================================
// Type Table
// ============================================================================

/// Attribute cast for a field type; `None` leaves the attribute uncast
pub fn cast_for(field_type: &str) -> Option<&'static str> {
    let cast = match field_type {
        "string" | "text" | "email" | "url" | "password" | "uuid" | "ip" | "time" => "string",
        "integer" | "bigInteger" | "year" => "integer",
        "float" => "float",
        "decimal" => "decimal:2",
        "boolean" => "boolean",
        "date" => "date",
        "datetime" | "timestamp" => "datetime",
        "json" => "array",
        _ => return None,
    };
    Some(cast)
}

fn field_cast(field: &Field) -> Option<String> {
    field
        .options
        .cast
        .clone()
        .or_else(|| cast_for(&field.field_type).map(str::to_string))
}

// ============================================================================
// Model File
// ============================================================================

fn build_model(dp: &DataPoint, paths: &ResolvedPaths) -> ScaffoldResult<PhpFile> {
    let mut file = PhpFile::new(
        paths.model_namespace.clone(),
        PhpClass::new(dp.model_name()),
    );

    let base = file.import(BASE_MODEL);
    file.class.extends = Some(base);

    let has_factory = file.import(HAS_FACTORY);
    file.class.use_trait(has_factory);
    for trait_name in dp.additional_traits() {
        let short = file.import(trait_name);
        file.class.use_trait(short);
    }
    for interface in dp.additional_interfaces() {
        let short = file.import(interface);
        file.class.implement(short);
    }

    if !dp.has_timestamps() {
        file.class
            .property(Property::public("timestamps", PhpValue::Bool(false)));
    }

    file.class.property(Property::protected(
        "fillable",
        PhpValue::str_list(dp.fields().iter().map(|f| f.name.clone())),
    ));

    let casts: Vec<(String, PhpValue)> = dp
        .fields()
        .iter()
        .filter_map(|f| field_cast(f).map(|c| (f.name.clone(), PhpValue::str(c))))
        .collect();
    optional_property(&mut file.class, "casts", PhpValue::str_map(casts));

    let hidden = dp
        .fields()
        .iter()
        .filter(|f| f.options.hidden)
        .map(|f| f.name.as_str());
    optional_property(&mut file.class, "hidden", PhpValue::str_list(hidden));

    let appended: Vec<&Field> = dp.fields().iter().filter(|f| f.options.appends).collect();
    optional_property(
        &mut file.class,
        "appends",
        PhpValue::str_list(appended.iter().map(|f| f.name.clone())),
    );

    let attributes: Vec<(String, PhpValue)> = dp
        .fields()
        .iter()
        .filter_map(|f| {
            f.options
                .default
                .as_ref()
                .map(|d| (f.name.clone(), default_literal(d)))
        })
        .collect();
    optional_property(&mut file.class, "attributes", PhpValue::str_map(attributes));

    for field in appended {
        file.class.method(accessor_method(field));
    }

    for rel in dp.distinct_relationships() {
        let method = relationship_method(dp, rel, paths, &mut file)?;
        file.class.method(method);
    }

    let skipped = dp.duplicate_relationship_count();
    if skipped > 0 {
        tracing::warn!(
            data_point = dp.name(),
            skipped,
            "relationships sharing an accessor name were not emitted"
        );
    }

    Ok(file)
}

/// Protected array property, left out when empty
fn optional_property(class: &mut PhpClass, name: &str, value: PhpValue) {
    if !value.is_empty_array() {
        class.property(Property::protected(name, value));
    }
}

fn accessor_method(field: &Field) -> Method {
    Method::public(format!("get{}Attribute", naming::studly(&field.name)))
        .returns("mixed")
        .line(format!("return $this->attributes['{}'] ?? null;", field.name))
}

/// The accessor method for one relationship
fn relationship_method(
    dp: &DataPoint,
    rel: &Relationship,
    paths: &ResolvedPaths,
    file: &mut PhpFile,
) -> ScaffoldResult<Method> {
    let shape = rel.relation_type.shape();
    let options = &rel.options;

    let call = match rel.relation_type {
        RelationType::MorphTo => format!(
            "$this->{}({})",
            shape.method,
            call_args(
                &crate::php::quote(&rel.morph_name()),
                &[Some(rel.morph_type()), Some(rel.morph_id())],
            )
        ),
        RelationType::MorphByMany => {
            return Err(ScaffoldError::unsupported_relationship(
                rel.relation_type,
                dp.name(),
            ));
        }
        _ => {
            let related = file.import(&paths.model_class(&rel.related_model()));
            let class_ref = format!("{}::class", related);
            let args = match rel.relation_type {
                RelationType::BelongsToMany => call_args(
                    &class_ref,
                    &[
                        options.table.clone(),
                        options.foreign_key.clone(),
                        options.local_key.clone(),
                    ],
                ),
                RelationType::MorphOne | RelationType::MorphMany => {
                    call_args(&class_ref, &[Some(rel.morph_name())])
                }
                RelationType::MorphToMany => {
                    call_args(&class_ref, &[Some(rel.morph_name()), options.table.clone()])
                }
                _ => call_args(
                    &class_ref,
                    &[options.foreign_key.clone(), options.local_key.clone()],
                ),
            };
            format!("$this->{}({})", shape.method, args)
        }
    };

    let call = if rel.requires_pivot_table() && options.with_timestamps {
        format!("{}->withTimestamps()", call)
    } else {
        call
    };

    let return_type = file.import(&rel.relation_type.relation_import());

    Ok(Method::public(rel.accessor_name())
        .returns(return_type)
        .line(format!("return {};", call)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use datapoints_ir::DataPointChanges;
    use pretty_assertions::assert_eq;

    fn generate_one(dp: DataPoint) -> String {
        let artifacts = ModelGenerator
            .generate(&[dp], &TemplateOptions::default())
            .unwrap();
        assert_eq!(artifacts.len(), 1);
        artifacts[0].content().to_string()
    }

    #[test]
    fn test_plain_model_golden() {
        let post = DataPoint::new("Post")
            .add_field(Field::new("title", "string"))
            .add_field(Field::new("content", "text"));

        let expected = r"<?php

namespace App\Models;

use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Database\Eloquent\Model;

class Post extends Model
{
    use HasFactory;

    protected $fillable = [
        'title',
        'content',
    ];

    protected $casts = [
        'title' => 'string',
        'content' => 'string',
    ];
}
";
        assert_eq!(generate_one(post), expected);
    }

    #[test]
    fn test_path_uses_model_namespace() {
        let artifacts = ModelGenerator
            .generate(
                &[DataPoint::new("posts")],
                &TemplateOptions::default().with_output_path("/app"),
            )
            .unwrap();
        assert_eq!(
            artifacts[0].path(),
            std::path::Path::new("/app/app/Models/Post.php")
        );
    }

    #[test]
    fn test_fillable_preserves_field_order() {
        let dp = DataPoint::new("Event")
            .add_field(Field::new("zeta", "string"))
            .add_field(Field::new("alpha", "integer"))
            .add_field(Field::new("mid", "exotic"));
        let content = generate_one(dp);
        assert!(content.contains(
            "    protected $fillable = [\n        'zeta',\n        'alpha',\n        'mid',\n    ];"
        ));
        // unknown types are not cast
        assert!(!content.contains("'mid' =>"));
    }

    #[test]
    fn test_option_driven_properties() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("metadata", "json").with_cast("collection"))
            .add_field(Field::new("secret", "string").hidden())
            .add_field(Field::new("excerpt", "string").appended())
            .add_field(Field::new("published", "boolean").with_default(false));
        let content = generate_one(dp);

        assert!(content.contains("'metadata' => 'collection',"));
        assert!(content.contains("    protected $hidden = [\n        'secret',\n    ];"));
        assert!(content.contains("    protected $appends = [\n        'excerpt',\n    ];"));
        assert!(content.contains("    protected $attributes = [\n        'published' => false,\n    ];"));
        assert!(content.contains("    public function getExcerptAttribute(): mixed\n"));
        assert!(content.contains("return $this->attributes['excerpt'] ?? null;"));
    }

    #[test]
    fn test_without_timestamps() {
        let content = generate_one(DataPoint::new("Tag").without_timestamps());
        assert!(content.contains("    public $timestamps = false;"));
        assert!(content.contains("    protected $fillable = [];"));
    }

    #[test]
    fn test_relationship_methods_and_imports() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("title", "string"))
            .add_relationship(
                Relationship::belongs_to("User")
                    .with_foreign_key("user_id")
                    .with_local_key("id"),
            )
            .add_relationship(Relationship::has_many("Comment"));
        let content = generate_one(dp);

        assert!(content.contains(
            "use Illuminate\\Database\\Eloquent\\Model;\nuse Illuminate\\Database\\Eloquent\\Relations\\BelongsTo;\nuse Illuminate\\Database\\Eloquent\\Relations\\HasMany;\n"
        ));
        assert!(content.contains(
            "    public function user(): BelongsTo\n    {\n        return $this->belongsTo(User::class, 'user_id', 'id');\n    }"
        ));
        assert!(content.contains(
            "    public function comments(): HasMany\n    {\n        return $this->hasMany(Comment::class);\n    }"
        ));
        // related models share the namespace and are not imported
        assert!(!content.contains("use App\\Models\\User;"));
    }

    #[test]
    fn test_morph_to_has_no_related_class() {
        let dp = DataPoint::new("Comment").add_relationship(Relationship::morph_to("commentable"));
        let content = generate_one(dp);
        assert!(content.contains("    public function commentable(): MorphTo\n"));
        assert!(content.contains(
            "return $this->morphTo('commentable', 'commentable_type', 'commentable_id');"
        ));
        assert!(content.contains("use Illuminate\\Database\\Eloquent\\Relations\\MorphTo;"));
    }

    #[test]
    fn test_pivot_relationships() {
        let dp = DataPoint::new("Post")
            .add_relationship(
                Relationship::belongs_to_many("Tag")
                    .with_local_key("tag_id")
                    .with_pivot_timestamps(),
            )
            .add_relationship(Relationship::new(RelationType::MorphMany, "Image"));
        let content = generate_one(dp);

        assert!(content.contains(
            "return $this->belongsToMany(Tag::class, null, null, 'tag_id')->withTimestamps();"
        ));
        assert!(content.contains("public function images(): MorphMany"));
        assert!(content.contains("return $this->morphMany(Image::class, 'imageable');"));
    }

    #[test]
    fn test_morph_by_many_is_unsupported() {
        let dp = DataPoint::new("Tag").add_relationship(Relationship::new(
            RelationType::MorphByMany,
            "Post",
        ));
        let err = ModelGenerator
            .generate(&[dp], &TemplateOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::UnsupportedRelationship { ref relation, .. } if relation == "morphByMany"
        ));
    }

    #[test]
    fn test_duplicate_accessors_emitted_once() {
        let dp = DataPoint::new("Post")
            .add_relationship(Relationship::belongs_to("User"))
            .add_relationship(Relationship::belongs_to("User").with_foreign_key("editor_id"));
        let content = generate_one(dp);
        assert_eq!(content.matches("public function user()").count(), 1);
        assert!(!content.contains("editor_id"));
    }

    #[test]
    fn test_traits_and_interfaces() {
        let dp = DataPoint::new("Post")
            .uses("Illuminate\\Database\\Eloquent\\SoftDeletes")
            .implements("App\\Contracts\\Publishable");
        let content = generate_one(dp);
        assert!(content.contains("class Post extends Model implements Publishable\n"));
        assert!(content.contains("    use HasFactory;\n    use SoftDeletes;\n"));
        assert!(content.contains("use App\\Contracts\\Publishable;\n"));
        assert!(content.contains("use Illuminate\\Database\\Eloquent\\SoftDeletes;\n"));
    }

    #[test]
    fn test_trait_sharing_relation_short_name() {
        let dp = DataPoint::new("Post")
            .uses("App\\Concerns\\HasMany")
            .add_relationship(Relationship::has_many("Comment"));
        let content = generate_one(dp);

        assert!(content.contains("use App\\Concerns\\HasMany;\n"));
        assert!(content.contains(
            "use Illuminate\\Database\\Eloquent\\Relations\\HasMany as RelationsHasMany;\n"
        ));
        assert!(content.contains("    use HasFactory;\n    use HasMany;\n"));
        assert!(content.contains("    public function comments(): RelationsHasMany\n"));
    }

    #[test]
    fn test_empty_option_properties_are_omitted() {
        let dp = DataPoint::new("Event").add_field(Field::new("payload", "exotic"));
        let content = generate_one(dp);
        assert!(content.contains("protected $fillable"));
        for property in ["$casts", "$hidden", "$appends", "$attributes"] {
            assert!(!content.contains(property), "{} should be omitted", property);
        }
    }

    #[test]
    fn test_custom_namespace() {
        let dp = DataPoint::new("Post").add_relationship(Relationship::belongs_to("User"));
        let artifacts = ModelGenerator
            .generate(
                &[dp],
                &TemplateOptions::default().with_namespace("Domain\\Blog\\Models"),
            )
            .unwrap();
        let content = artifacts[0].content();
        assert!(content.contains("namespace Domain\\Blog\\Models;"));
        assert!(!content.contains("use Domain\\Blog\\Models\\User;"));
    }

    #[test]
    fn test_deterministic() {
        let dp = DataPoint::new("Post")
            .add_field(Field::new("title", "string"))
            .add_relationship(Relationship::has_many("Comment"))
            .with(DataPointChanges::default());
        let first = generate_one(dp.clone());
        let second = generate_one(dp);
        assert_eq!(first, second);
    }
}
