//! # Resource Generator
//!
//! A JSON resource and a resource collection per DataPoint. Relationships
//! are exposed behind `whenLoaded` so that unloaded relations never
//! trigger a query.

use super::{Generator, php_artifact};
use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::paths::{RESOURCE_NAMESPACE, resolve};
use crate::php::{Method, PhpClass, PhpFile, PhpValue, quote};
use datapoints_core::{RelationType, ScaffoldResult};
use datapoints_ir::{DataPoint, Relationship, TemplateOptions, naming};

const REQUEST: &str = "Illuminate\\Http\\Request";
const JSON_RESOURCE: &str = "Illuminate\\Http\\Resources\\Json\\JsonResource";
const RESOURCE_COLLECTION: &str = "Illuminate\\Http\\Resources\\Json\\ResourceCollection";

/// Generates `{Model}Resource` and `{Model}Collection`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceGenerator;

impl Generator for ResourceGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Resource
    }

    fn generate(
        &self,
        data_points: &[DataPoint],
        options: &TemplateOptions,
    ) -> ScaffoldResult<Vec<GeneratedArtifact>> {
        let paths = resolve(options);
        let mut artifacts = Vec::with_capacity(data_points.len() * 2);

        for dp in data_points {
            let resource = resource_class(&dp.model_name());
            artifacts.push(php_artifact(
                paths.class_path(RESOURCE_NAMESPACE, &resource),
                ArtifactKind::Resource,
                build_resource(dp, &resource),
            ));

            let collection = collection_class(&dp.model_name());
            artifacts.push(php_artifact(
                paths.class_path(RESOURCE_NAMESPACE, &collection),
                ArtifactKind::Resource,
                build_collection(&collection),
            ));
        }

        Ok(artifacts)
    }
}

pub fn resource_class(model: &str) -> String {
    format!("{}Resource", model)
}

pub fn collection_class(model: &str) -> String {
    format!("{}Collection", model)
}

fn to_array() -> Method {
    Method::public("toArray")
        .param("Request $request")
        .returns("array")
}

fn relation_value(rel: &Relationship) -> PhpValue {
    let loaded = format!("$this->whenLoaded({})", quote(&rel.accessor_name()));
    let expr = match rel.relation_type {
        RelationType::MorphTo => format!("new JsonResource({})", loaded),
        _ if rel.is_to_many() => format!(
            "{}::collection({})",
            resource_class(&rel.related_model()),
            loaded
        ),
        _ => format!("new {}({})", resource_class(&rel.related_model()), loaded),
    };
    PhpValue::raw(expr)
}

fn build_resource(dp: &DataPoint, class: &str) -> PhpFile {
    let mut file = PhpFile::new(RESOURCE_NAMESPACE, PhpClass::new(class));
    file.import(REQUEST);
    let base = file.import(JSON_RESOURCE);
    file.class.extends = Some(base);

    let mut entries: Vec<(String, PhpValue)> = vec![("id".to_string(), PhpValue::raw("$this->id"))];
    for field in dp.fields() {
        entries.push((field.name.clone(), PhpValue::raw(format!("$this->{}", field.name))));
    }
    for rel in dp.distinct_relationships() {
        entries.push((naming::snake(&rel.accessor_name()), relation_value(rel)));
    }
    if dp.has_timestamps() {
        for column in ["created_at", "updated_at"] {
            entries.push((column.to_string(), PhpValue::raw(format!("$this->{}", column))));
        }
    }

    file.class.method(
        to_array().line(format!("return {};", PhpValue::str_map(entries).render())),
    );
    file
}

fn build_collection(class: &str) -> PhpFile {
    let mut file = PhpFile::new(RESOURCE_NAMESPACE, PhpClass::new(class));
    file.import(REQUEST);
    let base = file.import(RESOURCE_COLLECTION);
    file.class.extends = Some(base);

    let body = PhpValue::str_map([
        ("data", PhpValue::raw("$this->collection")),
        (
            "meta",
            PhpValue::str_map([("total", PhpValue::raw("$this->collection->count()"))]),
        ),
    ]);
    file.class
        .method(to_array().line(format!("return {};", body.render())));
    file
}

// ============================================================================
// Tests
// ============================================================================
