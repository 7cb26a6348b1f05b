use oas3::{
  Spec,
  spec::{ObjectSchema, Schema, SchemaType, SchemaTypeSet},
};

/// Extension methods for `ObjectSchema` to query its type properties conveniently.
pub(crate) trait SchemaExt {
  /// Returns the single `SchemaType` if exactly one is defined, or the non-null type
  /// from a two-type nullable set (e.g., `[string, null]` -> `string`).
  fn single_type_or_nullable(&self) -> Option<SchemaType>;

  /// Returns the OpenAPI spelling of the schema type, or an empty string when the
  /// type cannot be determined.
  ///
  /// # Example
  /// ```text
  /// { "type": "integer" }           => "integer"
  /// { "type": ["string", "null"] }  => "string"
  /// { "allOf": [...] }              => ""
  /// ```
  fn type_name(&self) -> String;

  /// Returns true if the schema is an array type (including nullable array).
  fn is_array(&self) -> bool;

  /// Returns true if the schema is an object type (including nullable object).
  fn is_object(&self) -> bool;

  /// Returns true if the schema declares no type and exactly one `allOf` member.
  ///
  /// Such a schema is an alias of its single member.
  fn is_single_composition(&self) -> bool;

  /// Resolves the array items schema.
  /// Returns None if: no items, items is a boolean schema, or the reference cannot be resolved.
  fn array_items(&self, spec: &Spec) -> Option<ObjectSchema>;

  /// Returns the description, falling back to the title, or an empty string.
  fn description_or_title(&self) -> String;
}

impl SchemaExt for ObjectSchema {
  fn single_type_or_nullable(&self) -> Option<SchemaType> {
    match self.schema_type.as_ref()? {
      SchemaTypeSet::Single(typ) => Some(*typ),
      SchemaTypeSet::Multiple(types) if types.len() == 2 && types.contains(&SchemaType::Null) => {
        types.iter().copied().find(|typ| *typ != SchemaType::Null)
      }
      SchemaTypeSet::Multiple(_) => None,
    }
  }

  fn type_name(&self) -> String {
    self
      .single_type_or_nullable()
      .map(schema_type_name)
      .unwrap_or_default()
      .to_string()
  }

  fn is_array(&self) -> bool {
    self.single_type_or_nullable() == Some(SchemaType::Array)
  }

  fn is_object(&self) -> bool {
    self.single_type_or_nullable() == Some(SchemaType::Object)
  }

  fn is_single_composition(&self) -> bool {
    self.schema_type.is_none() && self.all_of.len() == 1
  }

  fn array_items(&self, spec: &Spec) -> Option<ObjectSchema> {
    let items_box = self.items.as_ref()?;
    match items_box.as_ref() {
      Schema::Object(items_ref) => items_ref.resolve(spec).ok(),
      Schema::Boolean(_) => None,
    }
  }

  fn description_or_title(&self) -> String {
    self
      .description
      .as_ref()
      .filter(|desc| !desc.is_empty())
      .or(self.title.as_ref())
      .cloned()
      .unwrap_or_default()
  }
}

pub(crate) const fn schema_type_name(schema_type: SchemaType) -> &'static str {
  match schema_type {
    SchemaType::Boolean => "boolean",
    SchemaType::Integer => "integer",
    SchemaType::Number => "number",
    SchemaType::String => "string",
    SchemaType::Array => "array",
    SchemaType::Object => "object",
    SchemaType::Null => "null",
  }
}
