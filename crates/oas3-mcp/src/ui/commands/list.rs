use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{
    config::McpConfig,
    converter::{ConvertOptions, Converter},
  },
  ui::{Colors, colors::comfy, term_width},
  utils::SpecLoader,
};

pub async fn list_operations(input: &Path, tool_prefix: &str, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::open(input).await?.parse()?;
  let options = ConvertOptions::builder().tool_name_prefix(tool_prefix).build();
  let output = Converter::new(&document, options).convert()?;

  println!("{}", operations_table(&output.config, colors));
  Ok(())
}

/// One row per tool, in tool name order.
fn operations_table(config: &McpConfig, colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["TOOL", "METHOD", "PATH", "ARGS"] {
    header.add_cell(Cell::new(title).fg(comfy(colors.label())));
  }
  table.set_header(header);

  for tool in &config.tools {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&tool.name)
        .fg(comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(&tool.request_template.method)
        .fg(comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&tool.request_template.url).fg(comfy(colors.primary())));
    row.add_cell(
      Cell::new(tool.args.len())
        .fg(comfy(colors.info()))
        .set_alignment(CellAlignment::Right),
    );
    table.add_row(row);
  }

  table
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::{ui::colors::Theme, utils::SpecDocument};

  #[test]
  fn test_operations_table_lists_tools() {
    let document = SpecDocument::from_value(json!({
      "openapi": "3.0.0",
      "info": { "title": "Store", "version": "1.0" },
      "paths": {
        "/orders/{orderId}": {
          "delete": {
            "operationId": "deleteOrder",
            "parameters": [
              { "name": "orderId", "in": "path", "required": true, "schema": { "type": "string" } }
            ]
          }
        }
      }
    }))
    .unwrap();
    let options = ConvertOptions::builder().tool_name_prefix("store_").build();
    let output = Converter::new(&document, options).convert().unwrap();

    let rendered = operations_table(&output.config, &Colors::new(false, Theme::Dark)).to_string();
    assert!(rendered.contains("store_deleteOrder"));
    assert!(rendered.contains("DELETE"));
    assert!(rendered.contains("/orders/{orderId}"));
  }
}
