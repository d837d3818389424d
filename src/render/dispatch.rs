//! Block dispatcher
//!
//! Turns a validated [`PageConfig`] plus a [`DataSource`] into one
//! descriptor per block. Rendering is pure: the same inputs always yield
//! the same descriptors.

use serde_json::Value as JsonValue;

use crate::core::catalog::Catalog;
use crate::core::record::{DataSource, Record};
use crate::core::value::{compare_for_sort, or_placeholder};
use crate::render::descriptor::*;
use crate::schema::page::{
    Block, DataViewConfig, DetailPanelConfig, EmptyStateConfig, PageConfig, QueryBarConfig,
    StatOp, StatSummaryConfig,
};
use crate::schema::validator::{validate, ValidationErrors};
use crate::table::{TableColumn, TableRow};

/// Validate `input` and render it; invalid input never renders
pub fn render_page(
    input: &JsonValue,
    catalog: &Catalog,
    data: DataSource<'_>,
) -> Result<RenderedPage, ValidationErrors> {
    let config = validate(input, catalog)?;
    Ok(render_config(&config, catalog, data))
}

/// Render an already validated page
pub fn render_config(config: &PageConfig, catalog: &Catalog, data: DataSource<'_>) -> RenderedPage {
    RenderedPage {
        id: config.id.clone(),
        title: config.title.clone(),
        template: config.template,
        object_key: config.object_key.clone(),
        blocks: render(config, catalog, data),
    }
}

/// Render every block in order
///
/// A query bar with `enabled: false` produces no output.
pub fn render(config: &PageConfig, catalog: &Catalog, data: DataSource<'_>) -> Vec<BlockOutput> {
    tracing::debug!(
        page = %config.id,
        blocks = config.blocks.len(),
        records = data.len(),
        "rendering page"
    );
    config
        .blocks
        .iter()
        .filter_map(|block| render_block(block, &config.object_key, catalog, data))
        .collect()
}

pub fn render_block(
    block: &Block,
    object_key: &str,
    catalog: &Catalog,
    data: DataSource<'_>,
) -> Option<BlockOutput> {
    match block {
        Block::QueryBar { id, config } => render_query_bar(id, config),
        Block::DataView { id, config } => Some(render_data_view(id, config, object_key, catalog, data)),
        Block::DetailPanel { id, config } => Some(render_detail(id, config, object_key, catalog, data)),
        Block::StatSummary { id, config } => Some(render_stats(id, config, data)),
        Block::EmptyState { id, config } => Some(render_empty(id, config)),
    }
}

fn render_query_bar(id: &str, config: &QueryBarConfig) -> Option<BlockOutput> {
    config.enabled.then(|| {
        BlockOutput::QueryBar(QueryBarOutput {
            block_id: id.to_string(),
            placeholder: SEARCH_PLACEHOLDER.to_string(),
            disabled: true,
        })
    })
}

/// Column for a field, falling back to the raw key when the catalog has no entry
fn column_for(catalog: &Catalog, object_key: &str, field: &str) -> TableColumn {
    match catalog.property(object_key, field) {
        Some(prop) => TableColumn::new(field, prop.label.clone())
            .with_type(prop.property_type)
            .with_options(prop.options.iter().cloned()),
        None => TableColumn::new(field, field),
    }
}

fn render_data_view(
    id: &str,
    config: &DataViewConfig,
    object_key: &str,
    catalog: &Catalog,
    data: DataSource<'_>,
) -> BlockOutput {
    let columns: Vec<TableColumn> = config
        .fields
        .iter()
        .map(|f| column_for(catalog, object_key, f))
        .collect();

    let mut records: Vec<&Record> = data.records();
    if let Some(sort) = &config.sort {
        // Vec::sort_by is stable
        records.sort_by(|a, b| compare_for_sort(a.get(&sort.field), b.get(&sort.field), sort.direction));
    }

    let raw_rows: Vec<TableRow> = records
        .iter()
        .map(|record| {
            let mut row = TableRow::new(record.id.clone());
            for field in &config.fields {
                let value = record.get(field).cloned().unwrap_or(JsonValue::Null);
                row.values.insert(field.clone(), value);
            }
            row
        })
        .collect();

    let rows = raw_rows
        .iter()
        .map(|raw| {
            let mut row = TableRow::new(raw.id.clone());
            for field in &config.fields {
                row.values.insert(field.clone(), or_placeholder(raw.get(field)));
            }
            row
        })
        .collect();

    BlockOutput::DataView(DataViewOutput {
        block_id: id.to_string(),
        mode: config.mode,
        columns,
        rows,
        sort: config.sort.clone(),
        filters: config.filters.clone().unwrap_or_default(),
        raw_rows,
    })
}

fn render_detail(
    id: &str,
    config: &DetailPanelConfig,
    object_key: &str,
    catalog: &Catalog,
    data: DataSource<'_>,
) -> BlockOutput {
    let Some(record) = data.single() else {
        return BlockOutput::NotFound(NotFoundOutput::new(id));
    };

    let fields = config
        .fields
        .iter()
        .map(|field| {
            let column = column_for(catalog, object_key, field);
            DetailField {
                key: column.key,
                label: column.label,
                property_type: column.property_type,
                value: or_placeholder(record.get(field)),
            }
        })
        .collect();

    BlockOutput::DetailPanel(DetailPanelOutput {
        block_id: id.to_string(),
        record_id: record.id.clone(),
        fields,
    })
}

fn render_stats(id: &str, config: &StatSummaryConfig, data: DataSource<'_>) -> BlockOutput {
    let records = data.records();
    let stats = config
        .stats
        .iter()
        .map(|stat| {
            let value = match (&stat.op, &stat.field) {
                (Some(StatOp::Count), _) => StatValue::Count(data.len()),
                (None, Some(field)) => {
                    StatValue::Count(records.iter().filter(|r| r.has_value(field)).count())
                }
                (None, None) => StatValue::placeholder(),
            };
            StatOutput {
                label: stat.label.clone(),
                value,
            }
        })
        .collect();

    BlockOutput::StatSummary(StatSummaryOutput {
        block_id: id.to_string(),
        stats,
    })
}

fn render_empty(id: &str, config: &EmptyStateConfig) -> BlockOutput {
    BlockOutput::EmptyState(EmptyStateOutput {
        block_id: id.to_string(),
        title: config.title.clone(),
        description: config.description.clone(),
    })
}
