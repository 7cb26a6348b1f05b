use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Operation, Parameter},
};

use super::{
  config::{Arg, Position, SchemaDescriptor},
  schema_walker::SchemaWalker,
};
use crate::utils::SchemaExt as _;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds the flat argument list of a tool from parameters and the request body.
///
/// Parameter arguments keep their declared location as position; request body
/// properties become `body` arguments. The result is sorted by name with a
/// stable sort, so arguments sharing a name keep parameter-before-body order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArgumentBuilder<'a> {
  walker: SchemaWalker<'a>,
}

impl<'a> ArgumentBuilder<'a> {
  pub(crate) fn new(spec: &'a Spec) -> Self {
    Self {
      walker: SchemaWalker::new(spec),
    }
  }

  pub(crate) fn build(&self, path_params: &[ObjectOrReference<Parameter>], operation: &Operation) -> Vec<Arg> {
    let mut args = self
      .collect_parameters(path_params, operation)
      .iter()
      .map(|param| self.parameter_arg(param))
      .collect::<Vec<_>>();
    args.extend(self.body_args(operation));
    args.sort_by(|a, b| a.name.cmp(&b.name));
    args
  }

  /// Path-level parameters followed by operation parameters; an operation
  /// parameter replaces a path-level one with the same name and location.
  fn collect_parameters(&self, path_params: &[ObjectOrReference<Parameter>], operation: &Operation) -> Vec<Parameter> {
    let spec = self.walker.spec();
    let mut params = path_params
      .iter()
      .filter_map(|r| r.resolve(spec).ok())
      .collect::<Vec<_>>();

    for param in operation.parameters.iter().filter_map(|r| r.resolve(spec).ok()) {
      params.retain(|p| p.location != param.location || p.name != param.name);
      params.push(param);
    }

    params
  }

  pub(crate) fn parameter_arg(&self, param: &Parameter) -> Arg {
    let mut arg = Arg::builder()
      .name(param.name.clone())
      .description(param.description.clone().unwrap_or_default())
      .required(param.required.unwrap_or(false))
      .position(Position::from(param.location))
      .build();

    let Some(schema) = param.schema.as_ref().and_then(|s| self.walker.resolve(s)) else {
      return arg;
    };

    arg.arg_type = schema.type_name();
    arg.enum_values.clone_from(&schema.enum_values);

    if schema.is_array()
      && let Some(items) = schema.array_items(self.walker.spec())
    {
      arg.items = Some(SchemaDescriptor::of_type(items.type_name()));
    }

    // Parameters only describe one level of object properties.
    if schema.is_object() {
      arg.properties = self
        .walker
        .object_properties(&schema)
        .into_iter()
        .map(|(name, prop)| {
          let mut descriptor = SchemaDescriptor::of_type(prop.type_name());
          descriptor.description = prop.description.filter(|desc| !desc.is_empty());
          (name, descriptor)
        })
        .collect();
    }

    arg
  }

  /// One `body` argument per top-level property of the first JSON or form
  /// encoded request body. Non-object bodies produce no arguments.
  pub(crate) fn body_args(&self, operation: &Operation) -> Vec<Arg> {
    let spec = self.walker.spec();
    let Some(body) = operation.request_body.as_ref().and_then(|r| r.resolve(spec).ok()) else {
      return vec![];
    };

    let Some(schema) = body
      .content
      .iter()
      .filter(|(content_type, _)| accepts_arguments(content_type))
      .find_map(|(_, media_type)| media_type.schema.as_ref().and_then(|s| self.walker.resolve(s)))
    else {
      return vec![];
    };

    let required = self.walker.required_properties(&schema);
    self
      .walker
      .object_properties(&schema)
      .into_iter()
      .map(|(name, prop)| self.body_arg(name, &prop, &required))
      .collect()
  }

  fn body_arg(&self, name: String, prop: &ObjectSchema, required: &[String]) -> Arg {
    let mut arg = Arg::builder()
      .required(required.contains(&name))
      .name(name)
      .description(prop.description_or_title())
      .arg_type(prop.type_name())
      .enum_values(prop.enum_values.clone())
      .maybe_default_value(prop.default.clone())
      .position(Position::Body)
      .build();

    if prop.is_array()
      && let Some(items) = prop.array_items(self.walker.spec())
    {
      arg.items = Some(self.walker.descriptor(&items, 1));
    }
    if prop.is_single_composition() {
      arg.arg_type = "object".to_string();
    }
    arg.properties = self.walker.property_descriptors(prop, 1);

    arg
  }
}

fn accepts_arguments(content_type: &str) -> bool {
  content_type.contains(JSON_CONTENT_TYPE) || content_type.contains(FORM_CONTENT_TYPE)
}
