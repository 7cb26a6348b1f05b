use oas3::spec::{ObjectOrReference, Parameter};
use serde_json::json;

use super::support::{operation, parse_spec, spec_json};
use crate::generator::{
  arguments::ArgumentBuilder,
  config::{Position, SchemaDescriptor},
};

fn owner_schemas() -> serde_json::Value {
  json!({
    "Owner": {
      "type": "object",
      "properties": {
        "x": { "type": "string" },
        "y": { "type": "integer" }
      }
    }
  })
}

#[test]
fn test_parameters_keep_declared_position() {
  let spec = parse_spec(spec_json(json!({}), json!({})));
  let op = operation(json!({
    "parameters": [
      { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } },
      { "name": "limit", "in": "query", "description": "Page size", "schema": { "type": "integer" } },
      { "name": "X-Trace", "in": "header", "schema": { "type": "string" } },
      { "name": "session", "in": "cookie", "schema": { "type": "string" } }
    ],
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&[], &op);
  let summary = args
    .iter()
    .map(|arg| (arg.name.as_str(), arg.position, arg.required))
    .collect::<Vec<_>>();
  assert_eq!(
    summary,
    vec![
      ("X-Trace", Position::Header, false),
      ("limit", Position::Query, false),
      ("petId", Position::Path, true),
      ("session", Position::Cookie, false),
    ]
  );
  assert_eq!(args[1].description, "Page size");
  assert_eq!(args[1].arg_type, "integer");
}

#[test]
fn test_parameter_schema_details_are_copied() {
  let spec = parse_spec(spec_json(json!({}), json!({})));
  let op = operation(json!({
    "parameters": [
      {
        "name": "status",
        "in": "query",
        "schema": { "type": "string", "enum": ["available", "sold"] }
      },
      {
        "name": "ids",
        "in": "query",
        "schema": { "type": "array", "items": { "type": "integer" } }
      },
      {
        "name": "filter",
        "in": "query",
        "schema": {
          "type": "object",
          "properties": {
            "owner": {
              "type": "object",
              "description": "Owner filter",
              "properties": { "name": { "type": "string" } }
            }
          }
        }
      }
    ],
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&[], &op);
  let [filter, ids, status] = args.as_slice() else {
    panic!("expected three arguments, got {args:?}");
  };

  assert_eq!(status.enum_values, vec![json!("available"), json!("sold")]);
  assert_eq!(ids.arg_type, "array");
  assert_eq!(ids.items, Some(SchemaDescriptor::of_type("integer")));

  // Parameter objects are described one level deep only.
  let owner = &filter.properties["owner"];
  assert_eq!(owner.schema_type, "object");
  assert_eq!(owner.description.as_deref(), Some("Owner filter"));
  assert!(owner.properties.is_empty());
}

#[test]
fn test_operation_parameters_override_path_level_ones() {
  let spec = parse_spec(spec_json(json!({}), json!({})));
  let path_params: Vec<ObjectOrReference<Parameter>> = serde_json::from_value(json!([
    { "name": "petId", "in": "path", "required": true, "description": "shared", "schema": { "type": "string" } },
    { "name": "verbose", "in": "query", "schema": { "type": "boolean" } }
  ]))
  .unwrap();
  let op = operation(json!({
    "parameters": [
      { "name": "petId", "in": "path", "required": true, "description": "specific", "schema": { "type": "integer" } }
    ],
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&path_params, &op);
  assert_eq!(args.len(), 2);
  assert_eq!(args[0].name, "petId");
  assert_eq!(args[0].description, "specific");
  assert_eq!(args[0].arg_type, "integer");
  assert_eq!(args[1].name, "verbose");
}

#[test]
fn test_body_properties_become_body_arguments() {
  let spec = parse_spec(spec_json(json!({}), owner_schemas()));
  let op = operation(json!({
    "requestBody": {
      "content": {
        "application/json": {
          "schema": {
            "type": "object",
            "required": ["name"],
            "properties": {
              "name": { "type": "string", "title": "Pet name" },
              "status": { "type": "string", "enum": ["available", "sold"], "default": "available" },
              "tags": {
                "type": "array",
                "minItems": 1,
                "items": { "type": "string", "description": "A tag" }
              }
            }
          }
        }
      }
    },
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&[], &op);
  assert!(args.iter().all(|arg| arg.position == Position::Body));

  let [name, status, tags] = args.as_slice() else {
    panic!("expected three arguments, got {args:?}");
  };
  assert!(name.required);
  assert_eq!(name.description, "Pet name");
  assert!(!status.required);
  assert_eq!(status.default_value, Some(json!("available")));
  assert_eq!(status.enum_values.len(), 2);

  let items = tags.items.as_ref().expect("items described");
  assert_eq!(items.schema_type, "string");
  assert_eq!(items.description.as_deref(), Some("A tag"));
  assert_eq!(tags.arg_type, "array");
}

#[test]
fn test_single_composition_body_property_is_an_object() {
  let spec = parse_spec(spec_json(json!({}), owner_schemas()));
  let op = operation(json!({
    "requestBody": {
      "content": {
        "application/json": {
          "schema": {
            "type": "object",
            "properties": {
              "owner": { "allOf": [{ "$ref": "#/components/schemas/Owner" }] }
            }
          }
        }
      }
    },
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&[], &op);
  assert_eq!(args.len(), 1);
  assert_eq!(args[0].arg_type, "object");
  assert_eq!(
    args[0].properties.clone().into_iter().collect::<Vec<_>>(),
    vec![
      ("x".to_string(), SchemaDescriptor::of_type("string")),
      ("y".to_string(), SchemaDescriptor::of_type("integer")),
    ]
  );
}

#[test]
fn test_body_with_referenced_object_schema() {
  let spec = parse_spec(spec_json(json!({}), owner_schemas()));
  let op = operation(json!({
    "requestBody": {
      "content": {
        "application/x-www-form-urlencoded": {
          "schema": { "$ref": "#/components/schemas/Owner" }
        }
      }
    },
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&[], &op);
  assert_eq!(args.iter().map(|arg| arg.name.as_str()).collect::<Vec<_>>(), vec!["x", "y"]);
}

#[test]
fn test_unsupported_and_non_object_bodies_produce_no_arguments() {
  let spec = parse_spec(spec_json(json!({}), json!({})));
  for body in [
    json!({ "content": { "text/plain": { "schema": { "type": "object", "properties": { "a": { "type": "string" } } } } } }),
    json!({ "content": { "application/json": { "schema": { "type": "array", "items": { "type": "string" } } } } }),
    json!({ "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Missing" } } } }),
  ] {
    let op = operation(json!({ "requestBody": body.clone(), "responses": {} }));
    assert!(ArgumentBuilder::new(&spec).build(&[], &op).is_empty(), "{body}");
  }

  let empty = operation(json!({ "responses": {} }));
  assert!(ArgumentBuilder::new(&spec).build(&[], &empty).is_empty());
}

#[test]
fn test_duplicate_names_are_kept_in_stable_order() {
  let spec = parse_spec(spec_json(json!({}), json!({})));
  let op = operation(json!({
    "parameters": [
      { "name": "name", "in": "query", "schema": { "type": "string" } }
    ],
    "requestBody": {
      "content": {
        "application/json": {
          "schema": { "type": "object", "properties": { "name": { "type": "string" }, "age": { "type": "integer" } } }
        }
      }
    },
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&[], &op);
  let summary = args
    .iter()
    .map(|arg| (arg.name.as_str(), arg.position))
    .collect::<Vec<_>>();
  assert_eq!(
    summary,
    vec![
      ("age", Position::Body),
      ("name", Position::Query),
      ("name", Position::Body),
    ]
  );
}

#[test]
fn test_self_referential_body_stays_bounded() {
  let spec = parse_spec(spec_json(
    json!({}),
    json!({
      "Node": {
        "type": "object",
        "properties": {
          "a": { "$ref": "#/components/schemas/Node" },
          "b": { "$ref": "#/components/schemas/Node" },
          "c": { "$ref": "#/components/schemas/Node" },
          "v": { "type": "string" }
        }
      }
    }),
  ));
  let op = operation(json!({
    "requestBody": {
      "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Node" } } }
    },
    "responses": {}
  }));

  let args = ArgumentBuilder::new(&spec).build(&[], &op);
  assert_eq!(args.len(), 4);
  assert_eq!(args[0].properties.len(), 4);
  assert!(args[0].properties["a"].properties["a"].properties.is_empty());

  let size = serde_json::to_string(&args).unwrap().len();
  assert!(size < 8192, "arguments grew to {size} bytes");
}
