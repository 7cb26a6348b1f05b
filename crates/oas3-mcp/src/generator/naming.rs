use http::Method;
use oas3::spec::Operation;

/// Returns the declared `operationId`, or one derived from the method and path.
pub(crate) fn operation_id(path: &str, method: &Method, operation: &Operation) -> String {
  operation
    .operation_id
    .as_ref()
    .filter(|id| !id.is_empty())
    .cloned()
    .unwrap_or_else(|| generate_operation_id(method.as_str(), path))
}

/// Derives an identifier such as `get_pets_by_petid` from `GET /pets/{petId}`.
pub(crate) fn generate_operation_id(method: &str, path: &str) -> String {
  let path_parts = path
    .split('/')
    .filter(|s| !s.is_empty())
    .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(param) => format!("by_{param}"),
      None => s.to_string(),
    })
    .collect::<Vec<_>>();

  if path_parts.is_empty() {
    method.to_lowercase()
  } else {
    format!("{method}_{}", path_parts.join("_")).to_lowercase()
  }
}

/// Builds a tool description from an operation's summary and description.
pub(crate) fn operation_description(operation: &Operation) -> String {
  let summary = operation.summary.as_deref().unwrap_or_default();
  let description = operation.description.as_deref().unwrap_or_default();
  match (summary.is_empty(), description.is_empty()) {
    (false, false) => format!("{summary} - {description}"),
    (false, true) => summary.to_string(),
    (true, _) => description.to_string(),
  }
}
