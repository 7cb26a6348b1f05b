use std::fmt::Write as _;

use http::Method;
use oas3::spec::{Operation, Response};

use super::{
  config::{Header, RequestTemplate, ResponseTemplate, ToolSecurityRequirement},
  schema_walker::SchemaWalker,
};

pub(crate) const CONTENT_TYPE_HEADER: &str = "Content-Type";

const RESPONSE_GUIDE_HEADER: &str = "# API Response Information\n\n\
Below is the response from an API call. To help you understand the data, I've provided:\n\n\
1. A detailed description of all fields in the response structure\n\
2. The complete API response\n\n\
## Response Structure\n\n";

const RESPONSE_GUIDE_FOOTER: &str = "\n## Original Response\n\n";

/// What happens to the field guide generated for a tool's success response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseDocs {
  /// The guide is dropped and the response template stays empty.
  #[default]
  Discard,
  /// The guide becomes the response template's `prependBody`.
  Prepend,
}

/// Builds the request template of an operation.
///
/// Only the first scheme of the first security requirement is kept, and only
/// the first request body content type becomes a `Content-Type` header. Both
/// are taken in name order.
pub(crate) fn request_template(
  walker: &SchemaWalker<'_>,
  path: &str,
  method: &Method,
  operation: &Operation,
) -> RequestTemplate {
  let mut template = RequestTemplate {
    url: path.to_string(),
    method: method.as_str().to_uppercase(),
    security: first_security_scheme(operation).map(ToolSecurityRequirement::new),
    ..Default::default()
  };

  let content_type = operation
    .request_body
    .as_ref()
    .and_then(|r| r.resolve(walker.spec()).ok())
    .and_then(|body| body.content.keys().next().cloned());
  if let Some(content_type) = content_type {
    template.headers.push(Header::new(CONTENT_TYPE_HEADER, content_type));
  }

  template
}

fn first_security_scheme(operation: &Operation) -> Option<String> {
  operation
    .security
    .iter()
    .find_map(|requirement| requirement.0.keys().next().cloned())
}

/// Builds the response template of an operation from its first `2xx` response.
pub(crate) fn response_template(walker: &SchemaWalker<'_>, operation: &Operation, docs: ResponseDocs) -> ResponseTemplate {
  let Some(response) = success_response(walker, operation) else {
    return ResponseTemplate::default();
  };
  if response.content.is_empty() {
    return ResponseTemplate::default();
  }

  match docs {
    ResponseDocs::Discard => ResponseTemplate::default(),
    ResponseDocs::Prepend => ResponseTemplate {
      prepend_body: response_guide(walker, &response),
      ..Default::default()
    },
  }
}

fn success_response(walker: &SchemaWalker<'_>, operation: &Operation) -> Option<Response> {
  operation
    .responses
    .as_ref()?
    .iter()
    .filter(|(status, _)| status.starts_with('2'))
    .find_map(|(_, response_ref)| response_ref.resolve(walker.spec()).ok())
}

/// Markdown guide describing every field of a response, one section per content type.
pub(crate) fn response_guide(walker: &SchemaWalker<'_>, response: &Response) -> String {
  let mut guide = String::from(RESPONSE_GUIDE_HEADER);

  for (content_type, media_type) in &response.content {
    let Some(schema) = media_type.schema.as_ref().and_then(|s| walker.resolve(s)) else {
      continue;
    };

    let _ = writeln!(guide, "> Content-Type: {content_type}\n");
    for line in walker.document(&schema) {
      let _ = writeln!(guide, "{line}");
    }
  }

  guide.push_str(RESPONSE_GUIDE_FOOTER);
  guide
}
