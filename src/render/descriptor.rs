//! Render descriptors - fully resolved display data per block

use serde::Serialize;
use serde_json::Value;

use crate::core::property::PropertyType;
use crate::core::value::PLACEHOLDER;
use crate::schema::page::{Filter, SortSpec, Template, ViewMode};
use crate::table::{InteractiveTable, TableColumn, TableRow, TableSettings};

/// Hint text of the query bar affordance
pub const SEARCH_PLACEHOLDER: &str = "Search...";

/// Output of rendering a whole page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub id: String,
    pub title: String,
    pub template: Template,
    pub object_key: String,
    pub blocks: Vec<BlockOutput>,
}

/// Output of rendering one block
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BlockOutput {
    QueryBar(QueryBarOutput),
    DataView(DataViewOutput),
    DetailPanel(DetailPanelOutput),
    NotFound(NotFoundOutput),
    StatSummary(StatSummaryOutput),
    EmptyState(EmptyStateOutput),
}

impl BlockOutput {
    pub fn block_id(&self) -> &str {
        match self {
            BlockOutput::QueryBar(o) => &o.block_id,
            BlockOutput::DataView(o) => &o.block_id,
            BlockOutput::DetailPanel(o) => &o.block_id,
            BlockOutput::NotFound(o) => &o.block_id,
            BlockOutput::StatSummary(o) => &o.block_id,
            BlockOutput::EmptyState(o) => &o.block_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BlockOutput::QueryBar(_) => "queryBar",
            BlockOutput::DataView(_) => "dataView",
            BlockOutput::DetailPanel(_) => "detailPanel",
            BlockOutput::NotFound(_) => "notFound",
            BlockOutput::StatSummary(_) => "statSummary",
            BlockOutput::EmptyState(_) => "emptyState",
        }
    }
}

/// A search input that is shown but not wired to anything
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBarOutput {
    pub block_id: String,
    pub placeholder: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataViewOutput {
    pub block_id: String,
    pub mode: ViewMode,
    pub columns: Vec<TableColumn>,
    /// Projected rows with the placeholder substituted for missing values
    pub rows: Vec<TableRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    /// Carried through from the configuration; never applied to `rows`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// Projected rows with raw values, in the same order as `rows`
    #[serde(skip)]
    pub raw_rows: Vec<TableRow>,
}

impl DataViewOutput {
    /// Build an interactive table over the raw (unsubstituted) rows
    pub fn interactive(&self, settings: TableSettings) -> InteractiveTable {
        InteractiveTable::new(self.columns.clone(), self.raw_rows.clone(), settings)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPanelOutput {
    pub block_id: String,
    pub record_id: String,
    pub fields: Vec<DetailField>,
}

/// Detail block rendered without a record to show
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundOutput {
    pub block_id: String,
    pub message: String,
}

impl NotFoundOutput {
    pub fn new(block_id: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            message: "Record not found".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(usize),
    Placeholder(&'static str),
}

impl StatValue {
    pub fn placeholder() -> Self {
        StatValue::Placeholder(PLACEHOLDER)
    }

    pub fn as_count(&self) -> Option<usize> {
        match self {
            StatValue::Count(n) => Some(*n),
            StatValue::Placeholder(_) => None,
        }
    }
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Count(n) => write!(f, "{}", n),
            StatValue::Placeholder(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatOutput {
    pub label: String,
    pub value: StatValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSummaryOutput {
    pub block_id: String,
    pub stats: Vec<StatOutput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyStateOutput {
    pub block_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
