use std::{collections::BTreeMap, fmt, iter};

use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Schema},
};

use super::config::SchemaDescriptor;
use crate::utils::SchemaExt as _;

/// Nesting depth beyond which schemas are no longer described.
pub(crate) const MAX_SCHEMA_DEPTH: usize = 10;

/// One line of the human-readable field guide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldDoc {
  pub(crate) path: String,
  pub(crate) description: String,
  pub(crate) type_name: String,
  pub(crate) depth: usize,
}

impl FieldDoc {
  fn field(path: String, schema: &ObjectSchema, depth: usize) -> Self {
    Self {
      path,
      description: schema.description.clone().unwrap_or_default(),
      type_name: schema.type_name(),
      depth,
    }
  }

  fn scalar_items(path: String, type_name: &str, depth: usize) -> Self {
    Self {
      path,
      description: format!("Items of type {type_name}"),
      type_name: String::new(),
      depth,
    }
  }
}

impl fmt::Display for FieldDoc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = "  ".repeat(self.depth);
    write!(f, "{indent}- **{}**: {}", self.path, self.description)?;
    if !self.type_name.is_empty() {
      write!(f, " (Type: {})", self.type_name)?;
    }
    Ok(())
  }
}

/// Recursive, depth-bounded traversal of schemas.
///
/// Every method is a pure function of `(schema, path, depth)`; the document is only
/// consulted to resolve `$ref`s. Properties are always visited in name order.
///
/// Recursion also stops at a `$ref` already being walked further up the current
/// path, so self-referential schemas are described once and then cut off.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SchemaWalker<'a> {
  spec: &'a Spec,
  max_depth: usize,
}

/// `$ref` paths of the schemas enclosing the one being walked.
type RefStack = Vec<String>;

/// A resolved schema and the reference it was reached through, if any.
#[derive(Debug, Clone)]
struct Resolved {
  schema: ObjectSchema,
  ref_path: Option<String>,
}

impl Resolved {
  fn new(schema_ref: &ObjectOrReference<ObjectSchema>, schema: ObjectSchema) -> Self {
    let ref_path = ref_path(schema_ref)
      .or_else(|| {
        schema
          .is_single_composition()
          .then(|| schema.all_of.first().and_then(ref_path))
          .flatten()
      })
      .map(str::to_string);
    Self { schema, ref_path }
  }
}

fn ref_path(schema_ref: &ObjectOrReference<ObjectSchema>) -> Option<&str> {
  match schema_ref {
    ObjectOrReference::Ref { ref_path, .. } => Some(ref_path),
    ObjectOrReference::Object(_) => None,
  }
}

impl<'a> SchemaWalker<'a> {
  pub(crate) fn new(spec: &'a Spec) -> Self {
    Self {
      spec,
      max_depth: MAX_SCHEMA_DEPTH,
    }
  }

  #[cfg(test)]
  pub(crate) fn with_max_depth(self, max_depth: usize) -> Self {
    Self { max_depth, ..self }
  }

  pub(crate) fn spec(&self) -> &'a Spec {
    self.spec
  }

  pub(crate) fn resolve(&self, schema_ref: &ObjectOrReference<ObjectSchema>) -> Option<ObjectSchema> {
    schema_ref.resolve(self.spec).ok()
  }

  fn resolve_tracked(&self, schema_ref: &ObjectOrReference<ObjectSchema>) -> Option<Resolved> {
    Some(Resolved::new(schema_ref, self.resolve(schema_ref)?))
  }

  fn resolved_items(&self, schema: &ObjectSchema) -> Option<Resolved> {
    match schema.items.as_deref()? {
      Schema::Object(items_ref) => self.resolve_tracked(items_ref),
      Schema::Boolean(_) => None,
    }
  }

  /// Runs `walk` with `resolved` pushed onto the stack, or returns `None` when its
  /// reference is already on it.
  fn enter<T>(stack: &mut RefStack, resolved: &Resolved, walk: impl FnOnce(&mut RefStack) -> T) -> Option<T> {
    match &resolved.ref_path {
      Some(path) if stack.contains(path) => None,
      Some(path) => {
        stack.push(path.clone());
        let out = walk(stack);
        stack.pop();
        Some(out)
      }
      None => Some(walk(stack)),
    }
  }

  /// Returns the object schema aliased by a single-member `allOf`, following
  /// nested single-member compositions.
  pub(crate) fn composed_object(&self, schema: &ObjectSchema) -> Option<ObjectSchema> {
    self.composed_object_at(schema, 0)
  }

  fn composed_object_at(&self, schema: &ObjectSchema, depth: usize) -> Option<ObjectSchema> {
    if depth > self.max_depth || !schema.is_single_composition() {
      return None;
    }
    let member = self.resolve(schema.all_of.first()?)?;
    if member.is_object() {
      Some(member)
    } else {
      self.composed_object_at(&member, depth + 1)
    }
  }

  /// Resolved properties of an object schema, or of the object a single-member
  /// composition aliases. Unresolvable properties are dropped.
  pub(crate) fn object_properties(&self, schema: &ObjectSchema) -> BTreeMap<String, ObjectSchema> {
    self
      .resolved_properties(schema)
      .into_iter()
      .map(|(name, prop)| (name, prop.schema))
      .collect()
  }

  fn resolved_properties(&self, schema: &ObjectSchema) -> BTreeMap<String, Resolved> {
    if schema.is_object() {
      return schema
        .properties
        .iter()
        .filter_map(|(name, prop_ref)| Some((name.clone(), self.resolve_tracked(prop_ref)?)))
        .collect();
    }
    self
      .composed_object(schema)
      .map(|composed| self.resolved_properties(&composed))
      .unwrap_or_default()
  }

  /// Required property names of an object schema or its composed alias.
  pub(crate) fn required_properties(&self, schema: &ObjectSchema) -> Vec<String> {
    if schema.is_object() {
      return schema.required.clone();
    }
    self
      .composed_object(schema)
      .map(|composed| composed.required)
      .unwrap_or_default()
  }

  /// Field guide for a top-level response schema.
  ///
  /// Arrays get a synthetic `items` line followed by the item fields; objects
  /// list their properties starting at depth zero.
  pub(crate) fn document(&self, schema: &ObjectSchema) -> Vec<FieldDoc> {
    let mut stack = RefStack::new();
    if schema.is_array() {
      if self.resolved_items(schema).is_none() {
        return vec![];
      }
      let header = FieldDoc {
        path: "items".to_string(),
        description: "Array of items".to_string(),
        type_name: "array".to_string(),
        depth: 0,
      };
      return iter::once(header)
        .chain(self.field_docs_in(schema, "items", 1, &mut stack))
        .collect();
    }
    self.property_docs(&self.resolved_properties(schema), "", 0, &mut stack)
  }

  /// Field guide lines for the fields nested under `path`.
  pub(crate) fn field_docs(&self, schema: &ObjectSchema, path: &str, depth: usize) -> Vec<FieldDoc> {
    self.field_docs_in(schema, path, depth, &mut RefStack::new())
  }

  fn field_docs_in(&self, schema: &ObjectSchema, path: &str, depth: usize, stack: &mut RefStack) -> Vec<FieldDoc> {
    if depth > self.max_depth {
      return vec![];
    }

    if schema.is_array() {
      let Some(items) = self.resolved_items(schema) else {
        return vec![];
      };
      let item_path = format!("{path}[]");
      return Self::enter(stack, &items, |stack| {
        let properties = self.resolved_properties(&items.schema);
        if !properties.is_empty() {
          return self.property_docs(&properties, &item_path, depth, stack);
        }
        let type_name = items.schema.type_name();
        if type_name.is_empty() {
          return vec![];
        }
        vec![FieldDoc::scalar_items(item_path.clone(), &type_name, depth)]
      })
      .unwrap_or_default();
    }

    self.property_docs(&self.resolved_properties(schema), path, depth, stack)
  }

  fn property_docs(
    &self,
    properties: &BTreeMap<String, Resolved>,
    parent: &str,
    depth: usize,
    stack: &mut RefStack,
  ) -> Vec<FieldDoc> {
    let mut docs = vec![];
    for (name, prop) in properties {
      let path = join_path(parent, name);
      docs.push(FieldDoc::field(path.clone(), &prop.schema, depth));
      if let Some(nested) = Self::enter(stack, prop, |stack| {
        self.field_docs_in(&prop.schema, &path, depth + 1, stack)
      }) {
        docs.extend(nested);
      }
    }
    docs
  }

  /// Structured description of a schema: type, description, constraints and,
  /// while under the depth limit, its items and properties.
  pub(crate) fn descriptor(&self, schema: &ObjectSchema, depth: usize) -> SchemaDescriptor {
    self.descriptor_in(schema, depth, &mut RefStack::new())
  }

  fn descriptor_in(&self, schema: &ObjectSchema, depth: usize, stack: &mut RefStack) -> SchemaDescriptor {
    let description = schema.description_or_title();
    let mut descriptor = SchemaDescriptor {
      schema_type: schema.type_name(),
      description: (!description.is_empty()).then_some(description),
      min_items: schema.min_items.filter(|min| *min > 0),
      enum_values: schema.enum_values.clone(),
      default_value: schema.default.clone(),
      ..Default::default()
    };
    if schema.is_single_composition() {
      descriptor.schema_type = "object".to_string();
    }

    if depth >= self.max_depth {
      return descriptor;
    }

    if schema.is_array()
      && let Some(items) = self.resolved_items(schema)
    {
      descriptor.items = Some(Box::new(
        Self::enter(stack, &items, |stack| self.descriptor_in(&items.schema, depth + 1, stack))
          .unwrap_or_else(|| Self::leaf(&items.schema)),
      ));
    }
    descriptor.properties = self.property_descriptors_in(schema, depth + 1, stack);
    descriptor
  }

  /// Descriptors of every property of an object schema (or its composed alias).
  pub(crate) fn property_descriptors(&self, schema: &ObjectSchema, depth: usize) -> BTreeMap<String, SchemaDescriptor> {
    self.property_descriptors_in(schema, depth, &mut RefStack::new())
  }

  fn property_descriptors_in(
    &self,
    schema: &ObjectSchema,
    depth: usize,
    stack: &mut RefStack,
  ) -> BTreeMap<String, SchemaDescriptor> {
    if depth > self.max_depth {
      return BTreeMap::new();
    }
    self
      .resolved_properties(schema)
      .into_iter()
      .map(|(name, prop)| {
        let descriptor = Self::enter(stack, &prop, |stack| self.descriptor_in(&prop.schema, depth, stack))
          .unwrap_or_else(|| Self::leaf(&prop.schema));
        (name, descriptor)
      })
      .collect()
  }

  /// Type and description of a schema reached again through a cycle.
  fn leaf(schema: &ObjectSchema) -> SchemaDescriptor {
    let description = schema.description_or_title();
    let mut descriptor = SchemaDescriptor::of_type(schema.type_name());
    descriptor.description = (!description.is_empty()).then_some(description);
    if schema.is_single_composition() {
      descriptor.schema_type = "object".to_string();
    }
    descriptor
  }
}

fn join_path(parent: &str, name: &str) -> String {
  if parent.is_empty() {
    name.to_string()
  } else {
    format!("{parent}.{name}")
  }
}
