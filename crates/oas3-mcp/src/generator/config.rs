//! MCP server configuration model.
//!
//! These types are the output of a conversion run and, through [`ConfigTemplate`],
//! the input of the override step. Field names follow the camelCase wire format
//! consumed by the gateway runtime; empty values are omitted when serialized.

use std::collections::BTreeMap;

use oas3::spec::ParameterIn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form server configuration, keyed in sorted order.
pub type ConfigMap = BTreeMap<String, Value>;

/// Top-level MCP server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpConfig {
  pub server: ServerConfig,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tools: Vec<Tool>,
}

impl McpConfig {
  /// Puts tools and security schemes into name order. Stable, so entries
  /// sharing a name keep their relative order.
  pub fn sort(&mut self) {
    self.tools.sort_by(|a, b| a.name.cmp(&b.name));
    self.server.security_schemes.sort_by(|a, b| a.id.cmp(&b.id));
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
  #[builder(into)]
  pub name: String,
  #[builder(default, into)]
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub base_url: String,
  #[builder(default)]
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub config: ConfigMap,
  #[builder(default)]
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub security_schemes: Vec<SecurityScheme>,
}

/// A named authentication mechanism tools can reference by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
  pub id: String,
  /// `http`, `apiKey`, `oauth2`, `openIdConnect` or `mutualTLS`.
  #[serde(rename = "type")]
  pub scheme_type: String,
  /// `basic`, `bearer`, ... for `http` schemes.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scheme: Option<String>,
  /// `header`, `query` or `cookie` for `apiKey` schemes.
  #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Never read from the OpenAPI document; only templates set it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default_credential: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
  #[builder(into)]
  pub name: String,
  #[builder(default, into)]
  pub description: String,
  #[builder(default)]
  #[serde(default)]
  pub args: Vec<Arg>,
  pub request_template: RequestTemplate,
  #[builder(default)]
  #[serde(default, skip_serializing_if = "ResponseTemplate::is_empty")]
  pub response_template: ResponseTemplate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub security: Option<ToolSecurityRequirement>,
  #[builder(default)]
  #[serde(default, skip_serializing_if = "Map::is_empty")]
  pub annotations: Map<String, Value>,
}

/// Where a downstream runtime places an argument value when invoking the tool.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Position {
  Path,
  Query,
  Header,
  Cookie,
  Body,
}

impl From<ParameterIn> for Position {
  fn from(location: ParameterIn) -> Self {
    match location {
      ParameterIn::Path => Self::Path,
      ParameterIn::Query => Self::Query,
      ParameterIn::Header => Self::Header,
      ParameterIn::Cookie => Self::Cookie,
    }
  }
}

/// A single tool argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct Arg {
  #[builder(into)]
  pub name: String,
  #[builder(default, into)]
  #[serde(default)]
  pub description: String,
  #[builder(default, into)]
  #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
  pub arg_type: String,
  #[builder(default)]
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub required: bool,
  #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
  pub default_value: Option<Value>,
  #[builder(default)]
  #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
  pub enum_values: Vec<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<SchemaDescriptor>,
  #[builder(default)]
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: BTreeMap<String, SchemaDescriptor>,
  pub position: Position,
}

/// Nested description of an array item or object property schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
  #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
  pub schema_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_items: Option<u64>,
  #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
  pub enum_values: Vec<Value>,
  #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
  pub default_value: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<Box<SchemaDescriptor>>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: BTreeMap<String, SchemaDescriptor>,
}

impl SchemaDescriptor {
  /// A descriptor carrying only a type.
  #[must_use]
  pub fn of_type(schema_type: impl Into<String>) -> Self {
    Self {
      schema_type: schema_type.into(),
      ..Default::default()
    }
  }
}

/// How the runtime builds the outgoing HTTP request for a tool.
///
/// Every field defaults so that override templates may declare any subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestTemplate {
  /// Path template relative to the server base URL, placeholders unexpanded.
  pub url: String,
  pub method: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub headers: Vec<Header>,
  #[serde(skip_serializing_if = "String::is_empty")]
  pub body: String,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub args_to_json_body: bool,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub args_to_url_param: bool,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub args_to_form_body: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub security: Option<ToolSecurityRequirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
  pub key: String,
  pub value: String,
}

impl Header {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      value: value.into(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseTemplate {
  /// Replaces the upstream response body entirely.
  #[serde(skip_serializing_if = "String::is_empty")]
  pub body: String,
  #[serde(skip_serializing_if = "String::is_empty")]
  pub prepend_body: String,
  #[serde(skip_serializing_if = "String::is_empty")]
  pub append_body: String,
}

impl ResponseTemplate {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.body.is_empty() && self.prepend_body.is_empty() && self.append_body.is_empty()
  }
}

/// Reference from a tool to a [`SecurityScheme`] declared on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSecurityRequirement {
  pub id: String,
  /// Forward caller-supplied credentials unchanged instead of substituting defaults.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub passthrough: bool,
}

impl ToolSecurityRequirement {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      passthrough: false,
    }
  }
}

/// Partial configuration applied on top of a generated [`McpConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigTemplate {
  pub server: ServerTemplate,
  pub tools: ToolTemplate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerTemplate {
  pub config: ConfigMap,
  pub security_schemes: Vec<SecurityScheme>,
}

/// Fragments applied identically to every generated tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolTemplate {
  pub request_template: Option<RequestTemplate>,
  pub response_template: Option<ResponseTemplate>,
  pub security: Option<ToolSecurityRequirement>,
}
