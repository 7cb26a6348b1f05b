//! Conversion of an OpenAPI document into an MCP server configuration.
//!
//! ## Usage
//!
//! ```text
//! let document = SpecDocument::from_yaml(&content)?;
//! let options = ConvertOptions::builder().tool_name_prefix("petstore_").build();
//! let output = Converter::new(&document, options).convert()?;
//! println!("{} tools", output.stats.tools_generated);
//! ```

use oas3::spec::{Info, SecurityScheme as OpenApiSecurityScheme};
use serde_json::{Map, Value};

use super::{
  arguments::ArgumentBuilder,
  config::{ConfigMap, ConfigTemplate, McpConfig, SecurityScheme, ServerConfig, Tool},
  errors::ConvertError,
  naming::{operation_description, operation_id},
  schema_walker::SchemaWalker,
  templates::{self, ResponseDocs},
};
use crate::utils::{OperationEntry, SpecDocument};

/// Server name used when neither the document nor the caller provides one.
pub const DEFAULT_SERVER_NAME: &str = "openapi-server";

const ANNOTATIONS_KEY: &str = "annotations";

#[derive(Debug, Clone, Default, bon::Builder)]
pub struct ConvertOptions {
  /// Ignored when the document declares an `info.title`.
  #[builder(into)]
  pub server_name: Option<String>,
  #[builder(default)]
  pub server_config: ConfigMap,
  /// Prepended verbatim to every tool name.
  #[builder(default, into)]
  pub tool_name_prefix: String,
  pub template: Option<ConfigTemplate>,
  #[builder(default)]
  pub response_docs: ResponseDocs,
}

/// Statistics about a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
  pub tools_generated: usize,
  pub args_generated: usize,
  pub security_schemes: usize,
  pub secured_tools: usize,
  pub template_applied: bool,
}

impl ConversionStats {
  fn collect(config: &McpConfig, template_applied: bool) -> Self {
    Self {
      tools_generated: config.tools.len(),
      args_generated: config.tools.iter().map(|tool| tool.args.len()).sum(),
      security_schemes: config.server.security_schemes.len(),
      secured_tools: config
        .tools
        .iter()
        .filter(|tool| tool.security.is_some() || tool.request_template.security.is_some())
        .count(),
      template_applied,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ConversionOutput {
  pub config: McpConfig,
  pub stats: ConversionStats,
}

/// Converts every operation of a document into a tool.
///
/// A run is all-or-nothing: the first failing operation aborts the conversion
/// and no partial configuration is returned.
pub struct Converter<'a> {
  document: &'a SpecDocument,
  options: ConvertOptions,
}

impl<'a> Converter<'a> {
  pub fn new(document: &'a SpecDocument, options: ConvertOptions) -> Self {
    Self { document, options }
  }

  pub fn convert(&self) -> Result<ConversionOutput, ConvertError> {
    let mut config = McpConfig {
      server: self.build_server(),
      tools: vec![],
    };

    for entry in self.document.operations() {
      let tool = self
        .convert_operation(&entry)
        .map_err(|err| err.in_operation(entry.method.as_str(), &entry.path))?;
      config.tools.push(tool);
    }

    if let Some(template) = &self.options.template {
      config.apply_template(template);
    }
    config.sort();

    let stats = ConversionStats::collect(&config, self.options.template.is_some());
    Ok(ConversionOutput { config, stats })
  }

  fn build_server(&self) -> ServerConfig {
    let spec = self.document.spec();
    ServerConfig::builder()
      .name(server_name(&spec.info, self.options.server_name.as_deref()))
      .base_url(spec.servers.first().map(|server| server.url.clone()).unwrap_or_default())
      .config(self.options.server_config.clone())
      .security_schemes(self.security_schemes())
      .build()
  }

  fn security_schemes(&self) -> Vec<SecurityScheme> {
    let spec = self.document.spec();
    let Some(components) = spec.components.as_ref() else {
      return vec![];
    };

    let mut schemes = components
      .security_schemes
      .iter()
      .filter_map(|(id, scheme_ref)| {
        let scheme = scheme_ref.resolve(spec).ok()?;
        security_scheme(id, &scheme)
      })
      .collect::<Vec<_>>();
    schemes.sort_by(|a, b| a.id.cmp(&b.id));
    schemes
  }

  fn convert_operation(&self, entry: &OperationEntry<'_>) -> Result<Tool, ConvertError> {
    let spec = self.document.spec();
    let walker = SchemaWalker::new(spec);
    let OperationEntry {
      path,
      method,
      operation,
    } = entry;

    let name = format!(
      "{}{}",
      self.options.tool_name_prefix,
      operation_id(path, method, operation)
    );
    let annotations = self.annotations(entry)?;
    let args = ArgumentBuilder::new(spec).build(self.document.path_parameters(path), operation);

    Ok(
      Tool::builder()
        .name(name)
        .description(operation_description(operation))
        .args(args)
        .request_template(templates::request_template(&walker, path, method, operation))
        .response_template(templates::response_template(
          &walker,
          operation,
          self.options.response_docs,
        ))
        .annotations(annotations)
        .build(),
    )
  }

  fn annotations(&self, entry: &OperationEntry<'_>) -> Result<Map<String, Value>, ConvertError> {
    match self
      .document
      .operation_fragment(&entry.path, &entry.method, ANNOTATIONS_KEY)
    {
      None | Some(Value::Null) => Ok(Map::new()),
      Some(Value::Object(annotations)) => Ok(annotations.clone()),
      Some(other) => Err(ConvertError::Annotations {
        method: entry.method.to_string(),
        path: entry.path.clone(),
        reason: format!("expected a mapping, found {}", value_kind(other)),
      }),
    }
  }
}

/// `"<title> - <description>"` whenever the document has a title, regardless of
/// the requested name.
fn server_name(info: &Info, requested: Option<&str>) -> String {
  if !info.title.is_empty() {
    return format!(
      "{} - {}",
      info.title,
      info.description.as_deref().unwrap_or_default()
    );
  }
  requested
    .filter(|name| !name.is_empty())
    .unwrap_or(DEFAULT_SERVER_NAME)
    .to_string()
}

/// Maps a declared scheme through its wire form, which spells `type`, `scheme`,
/// `in` and `name` identically for every scheme kind.
fn security_scheme(id: &str, scheme: &OpenApiSecurityScheme) -> Option<SecurityScheme> {
  let wire = serde_json::to_value(scheme).ok()?;
  let field = |key: &str| wire.get(key).and_then(Value::as_str).map(str::to_string);

  Some(SecurityScheme {
    id: id.to_string(),
    scheme_type: field("type")?,
    scheme: field("scheme"),
    location: field("in"),
    name: field("name"),
    default_credential: None,
  })
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "a sequence",
    Value::Object(_) => "a mapping",
  }
}
