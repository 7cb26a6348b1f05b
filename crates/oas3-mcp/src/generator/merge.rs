//! Override template merging.
//!
//! A [`ConfigTemplate`] patches the generated configuration once, after every
//! tool is built. Tool fragments apply identically to every tool.

use super::{
  config::{ConfigTemplate, McpConfig, RequestTemplate, ResponseTemplate, ServerConfig, ServerTemplate, Tool, ToolTemplate},
  errors::ConvertError,
};

impl ConfigTemplate {
  /// Parses an override template. JSON input is accepted as well.
  pub fn from_yaml(content: &str) -> Result<Self, ConvertError> {
    serde_yaml::from_str(content).map_err(ConvertError::TemplateParse)
  }
}

impl McpConfig {
  pub fn apply_template(&mut self, template: &ConfigTemplate) {
    self.server.merge(&template.server);
    for tool in &mut self.tools {
      tool.merge(&template.tools);
    }
  }
}

impl ServerConfig {
  /// Config keys are unioned with the template winning; security schemes are
  /// replaced only when the template declares at least one.
  pub fn merge(&mut self, template: &ServerTemplate) {
    self
      .config
      .extend(template.config.iter().map(|(key, value)| (key.clone(), value.clone())));

    if !template.security_schemes.is_empty() {
      self.security_schemes.clone_from(&template.security_schemes);
    }
  }
}

impl Tool {
  pub fn merge(&mut self, template: &ToolTemplate) {
    if let Some(request) = &template.request_template {
      self.request_template.merge(request);
    }
    if let Some(response) = &template.response_template {
      self.response_template.merge(response);
    }
    if let Some(security) = &template.security {
      self.security = Some(security.clone());
    }
  }
}

impl RequestTemplate {
  /// Headers are appended after the generated ones. The `argsTo*` flags only
  /// ever turn on.
  pub fn merge(&mut self, template: &RequestTemplate) {
    self.headers.extend(template.headers.iter().cloned());
    replace_if_set(&mut self.body, &template.body);

    self.args_to_json_body |= template.args_to_json_body;
    self.args_to_url_param |= template.args_to_url_param;
    self.args_to_form_body |= template.args_to_form_body;

    if let Some(security) = &template.security {
      self.security = Some(security.clone());
    }
  }
}

impl ResponseTemplate {
  /// An empty template field leaves the generated value untouched.
  pub fn merge(&mut self, template: &ResponseTemplate) {
    replace_if_set(&mut self.body, &template.body);
    replace_if_set(&mut self.prepend_body, &template.prepend_body);
    replace_if_set(&mut self.append_body, &template.append_body);
  }
}

fn replace_if_set(target: &mut String, value: &str) {
  if !value.is_empty() {
    value.clone_into(target);
  }
}
