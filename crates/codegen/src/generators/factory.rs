//! # Factory Generator
//!
//! One model factory per DataPoint. Each field maps to a faker expression
//! through a fixed table; types with no entry are left out of the
//! definition. Every `belongsTo` adds `'{fk}' => Related::factory()`.

use super::{Generator, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::paths::{FACTORY_NAMESPACE, ResolvedPaths, resolve};
use crate::php::{Method, PhpClass, PhpFile, PhpValue, Property, quote};
use datapoints_core::ScaffoldResult;
use datapoints_ir::{DataPoint, Field, TemplateOptions};

const FACTORY: &str = "Illuminate\\Database\\Eloquent\\Factories\\Factory";
const STR: &str = "Illuminate\\Support\\Str";

/// Generates model factories
#[derive(Debug, Clone, Copy, Default)]
pub struct FactoryGenerator;

impl Generator for FactoryGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Factory
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        let paths = resolve(options);
        Ok(data_points
            .iter()
            .map(|dp| {
                let class = format!("{}Factory", dp.model_name());
                php_artifact(
                    paths.class_path(FACTORY_NAMESPACE, &class),
                    ArtifactKind::Factory,
                    build_factory(dp, &class, &paths),
                )
            })
            .collect())
    }
}

// ============================================================================
// Faker Table
// ============================================================================

/// Faker expression for a field, `None` when the type is unmapped
///
/// The `faker` option wins over the table; a bare method name gets `()`
/// and its string arguments are rewritten with single quotes.
pub fn faker_for(field: &Field) -> Option<String> {
    if let Some(custom) = &field.options.faker {
        let call = if custom.contains('(') {
            single_quoted(custom)
        } else {
            format!("{}()", custom)
        };
        return Some(format!("fake()->{}", call));
    }

    if field.name == "remember_token" {
        return Some("Str::random(10)".to_string());
    }

    let expr = match field.field_type.as_str() {
        "string" => "fake()->sentence()",
        "text" => "fake()->paragraphs(3, true)",
        "integer" | "bigInteger" => "fake()->randomNumber()",
        "float" | "decimal" => "fake()->randomFloat(2)",
        "boolean" => "fake()->boolean()",
        "date" => "fake()->date()",
        "datetime" | "timestamp" => "fake()->dateTime()",
        "time" => "fake()->time()",
        "year" => "fake()->year()",
        "email" => "fake()->safeEmail()",
        "url" => "fake()->url()",
        "password" => "bcrypt(fake()->password())",
        "uuid" => "Str::uuid()",
        "ip" => "fake()->ipv4()",
        "json" => "[]",
        _ => return None,
    };
    Some(expr.to_string())
}

/// Rewrite double-quoted string literals as single-quoted ones
///
/// Literals that interpolate or use escapes other than `\"` are kept as
/// written; single-quoted literals pass through untouched.
fn single_quoted(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut chars = expression.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                out.push(c);
                let mut escaped = false;
                for inner in chars.by_ref() {
                    out.push(inner);
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == '\'' {
                        break;
                    }
                }
            }
            '"' => {
                let mut raw = String::new();
                let mut escaped = false;
                let mut closed = false;
                for inner in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == '"' {
                        closed = true;
                        break;
                    }
                    raw.push(inner);
                }

                let plain = raw.replace("\\\"", "\"");
                if closed && !plain.contains('$') && !plain.contains('\\') {
                    out.push_str(&quote(&plain));
                } else {
                    out.push('"');
                    out.push_str(&raw);
                    if closed {
                        out.push('"');
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Factory File
// ============================================================================

fn build_factory(dp: &DataPoint, class: &str, paths: &ResolvedPaths) -> PhpFile {
    let mut file = PhpFile::new(FACTORY_NAMESPACE, PhpClass::new(class));
    let base = file.import(FACTORY);
    file.class.extends = Some(base);

    let model = file.import(&paths.model_class(&dp.model_name()));
    file.class.property(Property::protected(
        "model",
        PhpValue::raw(format!("{}::class", model)),
    ));

    let belongs_to = dp.belongs_to();
    let foreign_keys: Vec<String> = belongs_to.iter().map(|r| r.foreign_key()).collect();

    let mut definition: Vec<(String, PhpValue)> = Vec::new();
    for field in dp.fields() {
        if foreign_keys.contains(&field.name) {
            continue;
        }
        if let Some(expr) = faker_for(field) {
            if expr.contains("Str::") {
                file.import(STR);
            }
            definition.push((field.name.clone(), PhpValue::raw(expr)));
        }
    }
    for (rel, fk) in belongs_to.iter().zip(foreign_keys) {
        let related = file.import(&paths.model_class(&rel.related_model()));
        definition.push((fk, PhpValue::raw(format!("{}::factory()", related))));
    }

    file.class.method(
        Method::public("definition")
            .returns("array")
            .line(format!("return {};", PhpValue::str_map(definition).render())),
    );
    file
}

// ============================================================================
// Tests
// ============================================================================
