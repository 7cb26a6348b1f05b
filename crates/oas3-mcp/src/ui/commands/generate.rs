use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use itertools::Itertools as _;
use serde_json::Value;

use crate::{
  generator::{
    config::{ConfigMap, ConfigTemplate, McpConfig, Tool},
    converter::{ConversionOutput, ConversionStats, ConvertOptions, Converter},
    templates::ResponseDocs,
  },
  ui::{Colors, GenerateCommand, OutputFormat},
  utils::{SpecDocument, SpecFormat, SpecLoader},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub format: OutputFormat,
  pub server_name: Option<String>,
  pub server_config: ConfigMap,
  pub tool_prefix: String,
  pub template: Option<PathBuf>,
  pub response_docs: ResponseDocs,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      format,
      server_name,
      server_config,
      tool_prefix,
      template,
      response_docs,
      verbose,
      quiet,
    } = command;

    let format = format.unwrap_or_else(|| match SpecFormat::from_path(&output) {
      SpecFormat::Json => OutputFormat::Json,
      SpecFormat::Yaml => OutputFormat::Yaml,
    });

    Ok(Self {
      input,
      output,
      format,
      server_name,
      server_config: parse_server_config(server_config)?,
      tool_prefix,
      template,
      response_docs: response_docs.into(),
      verbose,
      quiet,
    })
  }

  async fn load_spec(&self) -> anyhow::Result<SpecDocument> {
    SpecLoader::open(&self.input).await?.parse()
  }

  async fn load_template(&self) -> anyhow::Result<Option<ConfigTemplate>> {
    let Some(path) = &self.template else {
      return Ok(None);
    };
    let content = tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("failed to read template '{}'", path.display()))?;
    let template =
      ConfigTemplate::from_yaml(&content).with_context(|| format!("invalid template '{}'", path.display()))?;
    Ok(Some(template))
  }

  fn convert_options(&self, template: Option<ConfigTemplate>) -> ConvertOptions {
    ConvertOptions::builder()
      .maybe_server_name(self.server_name.clone())
      .server_config(self.server_config.clone())
      .tool_name_prefix(self.tool_prefix.clone())
      .maybe_template(template)
      .response_docs(self.response_docs)
      .build()
  }

  async fn write_output(&self, content: String) -> anyhow::Result<()> {
    if let Some(parent) = self.output.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&self.output, content)
      .await
      .with_context(|| format!("failed to write '{}'", self.output.display()))
  }
}

/// Parses `KEY=VALUE` entries. Values are read as YAML scalars so that numbers
/// and booleans keep their type; anything else stays a string.
fn parse_server_config(entries: Vec<String>) -> anyhow::Result<ConfigMap> {
  let mut map = ConfigMap::new();
  for entry in entries {
    let (key, value) = entry
      .split_once('=')
      .filter(|(key, _)| !key.is_empty())
      .ok_or_else(|| anyhow::anyhow!("Invalid server config '{entry}': expected KEY=VALUE (e.g., timeout=30)"))?;
    map.insert(key.to_string(), scalar_value(value));
  }
  Ok(map)
}

fn scalar_value(raw: &str) -> Value {
  if raw.is_empty() {
    return Value::String(String::new());
  }
  match serde_yaml::from_str::<Value>(raw) {
    Ok(value @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
    _ => Value::String(raw.to_string()),
  }
}

/// Serializes a configuration in the requested syntax.
pub fn render(config: &McpConfig, format: OutputFormat) -> anyhow::Result<String> {
  match format {
    OutputFormat::Json => {
      let mut json = serde_json::to_string_pretty(config).context("failed to serialize configuration")?;
      json.push('\n');
      Ok(json)
    }
    OutputFormat::Yaml => serde_yaml::to_string(config).context("failed to serialize configuration"),
  }
}

/// `name (position)` for every argument of a tool, in argument order.
fn arg_summary(tool: &Tool) -> String {
  tool
    .args
    .iter()
    .map(|arg| format!("{} ({})", arg.name, arg.position))
    .join(", ")
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_template(&self) {
    if let Some(path) = &self.config.template {
      self.info(
        &format!("Loading override template from: {}", path.display())
          .with(self.colors.primary())
          .to_string(),
      );
    }
  }

  fn log_converting(&self) {
    self.info(&"Converting operations to MCP tools...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, output: &ConversionOutput) {
    if self.config.quiet {
      return;
    }

    let ConversionStats {
      tools_generated,
      args_generated,
      security_schemes,
      secured_tools,
      template_applied,
    } = &output.stats;

    self.stat("Server:", output.config.server.name.clone());
    self.stat("Tools generated:", tools_generated.to_string());
    self.stat("Arguments generated:", args_generated.to_string());
    if *security_schemes > 0 {
      self.stat("Security schemes:", security_schemes.to_string());
      self.stat("", format!("{secured_tools} secured tools"));
    }
    if *template_applied {
      self.stat("Template:", "applied".to_string());
    }

    if self.config.verbose {
      self.print_tools(&output.config);
    }
  }

  fn print_tools(&self, config: &McpConfig) {
    for tool in &config.tools {
      println!(
        "              {} {} {}",
        tool.request_template.method.as_str().with(self.colors.accent()),
        tool.request_template.url.as_str().with(self.colors.info()),
        format!("-> {}", tool.name).with(self.colors.primary())
      );
      if !tool.args.is_empty() {
        println!("                {}", arg_summary(tool).with(self.colors.label()));
      }
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated MCP server configuration".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_config(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = config.load_spec().await?;

  logger.log_template();
  let template = config.load_template().await?;

  logger.log_converting();
  let output = Converter::new(&document, config.convert_options(template)).convert()?;
  logger.print_statistics(&output);

  logger.log_writing();
  let content = render(&output.config, config.format)?;
  config.write_output(content).await?;

  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::generator::config::{Arg, Position, RequestTemplate};

  #[test]
  fn test_parse_server_config_empty() {
    let result = parse_server_config(vec![]).unwrap();
    assert!(result.is_empty());
  }

  #[test]
  fn test_parse_server_config_typed_scalars() {
    let result = parse_server_config(vec![
      "timeout=30".to_string(),
      "verify=true".to_string(),
      "region=eu-west-1".to_string(),
      "ratio=0.5".to_string(),
    ])
    .unwrap();

    assert_eq!(result.get("timeout"), Some(&json!(30)));
    assert_eq!(result.get("verify"), Some(&json!(true)));
    assert_eq!(result.get("region"), Some(&json!("eu-west-1")));
    assert_eq!(result.get("ratio"), Some(&json!(0.5)));
  }

  #[test]
  fn test_parse_server_config_non_scalars_stay_strings() {
    let result = parse_server_config(vec!["list=[1, 2]".to_string(), "empty=".to_string()]).unwrap();
    assert_eq!(result.get("list"), Some(&json!("[1, 2]")));
    assert_eq!(result.get("empty"), Some(&json!("")));
  }

  #[test]
  fn test_parse_server_config_with_equals_in_value() {
    let result = parse_server_config(vec!["query=a=b".to_string()]).unwrap();
    assert_eq!(result.get("query"), Some(&json!("a=b")));
  }

  #[test]
  fn test_parse_server_config_later_entries_win() {
    let result = parse_server_config(vec!["retries=1".to_string(), "retries=3".to_string()]).unwrap();
    assert_eq!(result.get("retries"), Some(&json!(3)));
  }

  #[test]
  fn test_arg_summary_names_positions() {
    let tool = Tool::builder()
      .name("getPet")
      .args(vec![
        Arg::builder().name("petId").position(Position::Path).build(),
        Arg::builder().name("verbose").position(Position::Query).build(),
        Arg::builder().name("X-Trace").position(Position::Header).build(),
      ])
      .request_template(RequestTemplate::default())
      .build();

    assert_eq!(arg_summary(&tool), "petId (path), verbose (query), X-Trace (header)");
  }

  #[test]
  fn test_parse_server_config_invalid_format() {
    for entry in ["timeout", "=30"] {
      let err = parse_server_config(vec![entry.to_string()]).unwrap_err();
      assert!(err.to_string().contains("Invalid server config"), "{entry}: {err}");
    }
  }
}
