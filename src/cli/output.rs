//! Terminal output for rendered pages and the catalog
//!
//! Text output is built with tabled and styled with console. Structured
//! formats bypass this module and serialize the descriptors directly.

use console::style;
use serde_json::Value;
use tabled::{builder::Builder, settings::Style};

use crate::core::catalog::Catalog;
use crate::core::object::ObjectDefinition;
use crate::core::value::PLACEHOLDER;
use crate::render::{
    BlockOutput, DataViewOutput, DetailPanelOutput, RenderedPage, StatSummaryOutput,
};
use crate::schema::page::ViewMode;
use crate::table::{format_value, FormatSettings, InteractiveTable, TableSettings};

use super::helpers::truncate_str;

/// Render a whole page as text
pub fn page_to_text(page: &RenderedPage, settings: &TableSettings) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style(&page.title).bold()));
    out.push_str(&format!(
        "{}\n",
        style(format!("{} · {} · {}", page.id, page.template, page.object_key)).dim()
    ));

    for block in &page.blocks {
        out.push('\n');
        out.push_str(&block_to_text(block, settings));
    }
    out
}

pub fn block_to_text(block: &BlockOutput, settings: &TableSettings) -> String {
    match block {
        BlockOutput::QueryBar(bar) => format!("{}\n", style(format!("[ {} ]", bar.placeholder)).dim()),
        BlockOutput::DataView(view) => data_view_to_text(view, settings),
        BlockOutput::DetailPanel(panel) => detail_to_text(panel, &settings.format),
        BlockOutput::NotFound(nf) => format!("{} {}\n", style("!").yellow(), nf.message),
        BlockOutput::StatSummary(summary) => stats_to_text(summary),
        BlockOutput::EmptyState(empty) => {
            let mut text = format!("{}\n", style(&empty.title).bold());
            if let Some(ref description) = empty.description {
                text.push_str(&format!("{}\n", style(description).dim()));
            }
            text
        }
    }
}

fn data_view_to_text(view: &DataViewOutput, settings: &TableSettings) -> String {
    let table = view.interactive(settings.clone());
    let rows = table.rows_in_view().len();

    let mut out = match view.mode {
        ViewMode::Table => table_to_text(&table),
        ViewMode::Cards => cards_to_text(&table),
    };

    out.push_str(&format!("{}\n", style(format!("{} record(s)", rows)).dim()));
    for filter in &view.filters {
        out.push_str(&format!(
            "{}\n",
            style(format!(
                "filter not applied: {} {} {}",
                filter.field, filter.op, filter.value
            ))
            .dim()
        ));
    }
    out
}

fn table_to_text(table: &InteractiveTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns().iter().map(|c| c.label.clone()));

    for row in 0..table.rows_in_view().len() {
        builder.push_record(table.columns().iter().map(|c| {
            table
                .formatted_cell(row, &c.key)
                .map(|cell| cell.text)
                .unwrap_or_default()
        }));
    }

    format!("{}\n", builder.build().with(Style::rounded()))
}

fn cards_to_text(table: &InteractiveTable) -> String {
    let mut out = String::new();
    for (index, row) in table.rows_in_view().iter().enumerate() {
        out.push_str(&format!("{}\n", style(format!("# {}", row.id)).cyan()));
        for column in table.columns() {
            let text = table
                .formatted_cell(index, &column.key)
                .map(|cell| cell.text)
                .unwrap_or_default();
            out.push_str(&format!("  {:<16} {}\n", style(&column.label).dim(), text));
        }
    }
    out
}

fn detail_to_text(panel: &DetailPanelOutput, format: &FormatSettings) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for field in &panel.fields {
        let text = if field.value == Value::String(PLACEHOLDER.to_string()) {
            PLACEHOLDER.to_string()
        } else {
            format_value(Some(&field.value), field.property_type, format).text
        };
        builder.push_record([field.label.clone(), text]);
    }
    format!(
        "{}\n{}\n",
        style(format!("Record {}", panel.record_id)).cyan(),
        builder.build().with(Style::rounded())
    )
}

fn stats_to_text(summary: &StatSummaryOutput) -> String {
    let mut builder = Builder::default();
    builder.push_record(summary.stats.iter().map(|s| s.label.clone()));
    builder.push_record(summary.stats.iter().map(|s| s.value.to_string()));
    format!("{}\n", builder.build().with(Style::rounded()))
}

/// One line per object
pub fn catalog_to_text(catalog: &Catalog) -> String {
    let mut builder = Builder::default();
    builder.push_record(["KEY", "LABEL", "PLURAL", "TYPE", "FIELDS", "ENABLED"]);
    for object in catalog.objects() {
        builder.push_record([
            object.object_key.clone(),
            object.label.clone(),
            object.label_plural.clone(),
            object.object_type_key.label().to_string(),
            object.properties.len().to_string(),
            if object.enabled { "yes" } else { "no" }.to_string(),
        ]);
    }
    format!("{}\n", builder.build().with(Style::blank()))
}

/// Field listing for one object
pub fn object_to_text(object: &ObjectDefinition) -> String {
    let mut out = String::new();
    let title = format!("{} ({})", object.label, object.object_key);
    out.push_str(&format!("{}\n", style(&title).bold()));
    out.push_str(&format!("{}\n", "=".repeat(title.chars().count())));
    out.push_str(&format!("{}\n", object.object_type_key.description()));
    if !object.enabled {
        out.push_str(&format!("{}\n", style("disabled: pages cannot use this object").yellow()));
    }
    out.push('\n');

    let mut builder = Builder::default();
    builder.push_record(["KEY", "LABEL", "TYPE", "REQ", "OPTIONS"]);
    for prop in &object.properties {
        builder.push_record([
            prop.key.clone(),
            prop.label.clone(),
            prop.property_type.to_string(),
            if prop.required { "yes" } else { "" }.to_string(),
            truncate_str(&prop.options.join(", "), 40),
        ]);
    }
    out.push_str(&format!("{}\n", builder.build().with(Style::blank())));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{DataSource, Record};
    use crate::render::render_page;
    use serde_json::json;

    #[test]
    fn test_page_to_text_contains_rows() {
        console::set_colors_enabled(false);
        let catalog = Catalog::builtin();
        let input = json!({
            "id": "contacts", "title": "Contacts", "template": "list", "objectKey": "contact",
            "blocks": [
                { "blockType": "queryBar", "id": "qb", "config": { "enabled": true } },
                { "blockType": "dataView", "id": "dv", "config": { "mode": "table", "fields": ["firstName", "email"] } }
            ]
        });
        let records = vec![
            Record::new("r1").with("firstName", "Ann").with("email", "a@x.com"),
            Record::new("r2").with("firstName", "Bo"),
        ];
        let page = render_page(&input, &catalog, DataSource::Collection(&records)).unwrap();
        let text = page_to_text(&page, &TableSettings::default());

        assert!(text.contains("Contacts"));
        assert!(text.contains("[ Search... ]"));
        assert!(text.contains("First Name"));
        assert!(text.contains("a@x.com"));
        assert!(text.contains(PLACEHOLDER));
        assert!(text.contains("2 record(s)"));
    }

    #[test]
    fn test_object_to_text() {
        console::set_colors_enabled(false);
        let catalog = Catalog::builtin();
        let text = object_to_text(catalog.lookup("contact").unwrap());
        assert!(text.contains("Contact (contact)"));
        assert!(text.contains("firstName"));
        assert!(text.contains("Lead, Active, Churned"));
    }
}
