use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::templates::ResponseDocs;

#[derive(Parser, Debug)]
#[command(name = "oas3-mcp")]
#[command(author, version, about = "OpenAPI to MCP server configuration converter")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate an MCP server configuration from an OpenAPI specification
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the OpenAPI specification (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Path where the MCP configuration will be written
  #[arg(short, long, value_name = "FILE")]
  pub output: PathBuf,

  /// Output syntax; defaults to JSON for `.json` outputs and YAML otherwise
  #[arg(long, value_enum)]
  pub format: Option<OutputFormat>,

  /// Server name, used only when the specification has no title
  #[arg(long, value_name = "NAME")]
  pub server_name: Option<String>,

  /// Server configuration entry; values are read as YAML scalars
  #[arg(long = "server-config", value_name = "KEY=VALUE")]
  pub server_config: Vec<String>,

  /// Prefix prepended to every tool name
  #[arg(long = "tool-prefix", value_name = "PREFIX", default_value = "")]
  pub tool_prefix: String,

  /// Override template (YAML or JSON) merged into the generated configuration
  #[arg(short, long, value_name = "FILE")]
  pub template: Option<PathBuf>,

  /// What to do with the generated response field guide
  #[arg(long, value_enum, default_value = "discard")]
  pub response_docs: ResponseDocsMode,

  /// Enable verbose output with per-tool details
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
  Yaml,
  Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseDocsMode {
  /// Drop the guide
  Discard,
  /// Prepend the guide to every tool response
  Prepend,
}

impl From<ResponseDocsMode> for ResponseDocs {
  fn from(mode: ResponseDocsMode) -> Self {
    match mode {
      ResponseDocsMode::Discard => Self::Discard,
      ResponseDocsMode::Prepend => Self::Prepend,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the tools the specification's operations convert into
  Operations {
    /// Path to the OpenAPI specification (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Prefix prepended to every tool name
    #[arg(long = "tool-prefix", value_name = "PREFIX", default_value = "")]
    tool_prefix: String,
  },
}
