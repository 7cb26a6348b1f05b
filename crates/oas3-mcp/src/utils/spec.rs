use std::{ffi::OsStr, path::Path};

use anyhow::Context as _;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use http::Method;
use itertools::Itertools as _;
use oas3::{
  Spec,
  spec::{ObjectOrReference, Operation, Parameter},
};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  Json,
  #[default]
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "json" => Self::Json,
      _ => Self::Yaml,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = SpecFormat::from_path(path);
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open OpenAPI document '{}'", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn parse(&self) -> anyhow::Result<SpecDocument> {
    match self.format {
      SpecFormat::Json => SpecDocument::from_json(self.file.as_slice()),
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.file.as_slice()).context("OpenAPI document is not valid UTF-8")?;
        SpecDocument::from_yaml(content)
      }
    }
  }
}

/// One operation of the document, keyed by its path template and method.
#[derive(Debug, Clone)]
pub struct OperationEntry<'a> {
  pub path: String,
  pub method: Method,
  pub operation: &'a Operation,
}

/// A parsed OpenAPI document.
///
/// Keeps the raw document tree next to the typed [`Spec`] so that fragments the
/// typed model drops (such as per-operation `annotations`) stay reachable.
#[derive(Debug, Clone)]
pub struct SpecDocument {
  spec: Spec,
  raw: Value,
}

impl SpecDocument {
  pub fn from_value(raw: Value) -> anyhow::Result<Self> {
    let spec = serde_json::from_value::<Spec>(raw.clone()).context("document is not a valid OpenAPI v3 specification")?;
    Ok(Self { spec, raw })
  }

  pub fn from_json(content: &[u8]) -> anyhow::Result<Self> {
    let raw = serde_json::from_slice::<Value>(content).context("failed to parse JSON document")?;
    Self::from_value(raw)
  }

  pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
    let raw = serde_yaml::from_str::<Value>(content).context("failed to parse YAML document")?;
    Self::from_value(raw)
  }

  pub fn spec(&self) -> &Spec {
    &self.spec
  }

  /// Returns every operation ordered by path, then by method name.
  pub fn operations(&self) -> Vec<OperationEntry<'_>> {
    self
      .spec
      .operations()
      .into_iter()
      .map(|(path, method, operation)| OperationEntry {
        path,
        method,
        operation,
      })
      .sorted_by(|a, b| {
        a.path
          .cmp(&b.path)
          .then_with(|| a.method.as_str().cmp(b.method.as_str()))
      })
      .collect()
  }

  /// Parameters declared on the path item, shared by all of its operations.
  pub fn path_parameters(&self, path: &str) -> &[ObjectOrReference<Parameter>] {
    self
      .spec
      .paths
      .as_ref()
      .and_then(|paths| paths.get(path))
      .map(|item| item.parameters.as_slice())
      .unwrap_or_default()
  }

  /// Looks up `paths.<path>.<method>.<key>` in the raw document.
  pub fn operation_fragment(&self, path: &str, method: &Method, key: &str) -> Option<&Value> {
    let pointer = format!(
      "/paths/{}/{}/{}",
      escape_pointer_token(path),
      method.as_str().to_ascii_lowercase(),
      escape_pointer_token(key)
    );
    self.raw.pointer(&pointer)
  }
}

fn escape_pointer_token(token: &str) -> String {
  token.replace('~', "~0").replace('/', "~1")
}
