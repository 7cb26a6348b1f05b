use thiserror::Error;

/// Failures that abort a conversion run.
///
/// Missing descriptions, unresolved `$ref`s and depth limits are not errors; they
/// degrade to empty values instead.
#[derive(Debug, Error)]
pub enum ConvertError {
  #[error("failed to parse override template: {0}")]
  TemplateParse(#[source] serde_yaml::Error),

  #[error("failed to parse annotations for {method} {path}: {reason}")]
  Annotations {
    method: String,
    path: String,
    reason: String,
  },

  #[error("failed to convert operation {method} {path}: {source}")]
  Operation {
    method: String,
    path: String,
    #[source]
    source: Box<ConvertError>,
  },
}

impl ConvertError {
  pub(crate) fn in_operation(self, method: &str, path: &str) -> Self {
    Self::Operation {
      method: method.to_string(),
      path: path.to_string(),
      source: Box::new(self),
    }
  }
}
