use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Operation},
};
use serde_json::{Value, json};

use crate::utils::SpecDocument;

pub(super) const PETSTORE_YAML: &str = include_str!("../../../fixtures/petstore.yaml");
pub(super) const OVERRIDE_TEMPLATE_YAML: &str = include_str!("../../../fixtures/override_template.yaml");

pub(super) fn petstore() -> SpecDocument {
  SpecDocument::from_yaml(PETSTORE_YAML).expect("failed to parse petstore fixture")
}

/// Minimal document with the given paths and component schemas.
pub(super) fn spec_json(paths: Value, schemas: Value) -> Value {
  json!({
    "openapi": "3.0.0",
    "info": { "title": "Test API", "version": "1.0.0" },
    "paths": paths,
    "components": { "schemas": schemas }
  })
}

pub(super) fn parse_spec(value: Value) -> Spec {
  serde_json::from_value(value).expect("failed to parse test spec")
}

pub(super) fn document(value: Value) -> SpecDocument {
  SpecDocument::from_value(value).expect("failed to parse test document")
}

pub(super) fn schema(value: Value) -> ObjectSchema {
  serde_json::from_value(value).expect("failed to parse test schema")
}

pub(super) fn operation(value: Value) -> Operation {
  serde_json::from_value(value).expect("failed to parse test operation")
}

pub(super) fn inline(value: Value) -> ObjectOrReference<ObjectSchema> {
  ObjectOrReference::Object(schema(value))
}

/// An object schema nested `levels` deep through properties named `l1`, `l2`, ...
pub(super) fn nested_objects(levels: usize) -> Value {
  (1..=levels).rev().fold(json!({ "type": "string" }), |inner, level| {
    json!({
      "type": "object",
      "description": format!("level {level}"),
      "properties": { format!("l{level}"): inner }
    })
  })
}

pub(super) fn reference(name: &str) -> ObjectOrReference<ObjectSchema> {
  serde_json::from_value(json!({ "$ref": format!("#/components/schemas/{name}") })).expect("failed to parse reference")
}
