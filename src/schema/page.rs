//! Page configuration data model
//!
//! A [`PageConfig`] describes a renderable page as data: a template, the
//! object it shows, and an ordered list of typed [`Block`]s. Values of these
//! types are only ever produced by [`crate::schema::validate`]; the serde
//! implementations mirror the JSON shape checked by the embedded schema so a
//! validated config serializes back to an equivalent document.

use serde::{Deserialize, Serialize};

pub use crate::core::value::SortDirection;

/// Overall page shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Collection of records with a query affordance
    List,
    /// A single record
    Detail,
    /// Summary stats over a collection
    Dashboard,
}

impl Template {
    /// Whether pages of this template are rendered over a single record
    pub fn is_single_record(&self) -> bool {
        matches!(self, Template::Detail)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Template::List => write!(f, "list"),
            Template::Detail => write!(f, "detail"),
            Template::Dashboard => write!(f, "dashboard"),
        }
    }
}

/// A validated page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageConfig {
    pub id: String,
    pub title: String,
    pub template: Template,
    pub object_key: String,
    pub blocks: Vec<Block>,
}

/// Discriminant of a [`Block`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    QueryBar,
    DataView,
    DetailPanel,
    StatSummary,
    EmptyState,
}

impl BlockType {
    pub fn all() -> &'static [BlockType] {
        &[
            BlockType::QueryBar,
            BlockType::DataView,
            BlockType::DetailPanel,
            BlockType::StatSummary,
            BlockType::EmptyState,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::QueryBar => "queryBar",
            BlockType::DataView => "dataView",
            BlockType::DetailPanel => "detailPanel",
            BlockType::StatSummary => "statSummary",
            BlockType::EmptyState => "emptyState",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One typed unit of page content, tagged by `blockType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "blockType", rename_all = "camelCase")]
pub enum Block {
    QueryBar { id: String, config: QueryBarConfig },
    DataView { id: String, config: DataViewConfig },
    DetailPanel { id: String, config: DetailPanelConfig },
    StatSummary { id: String, config: StatSummaryConfig },
    EmptyState { id: String, config: EmptyStateConfig },
}

impl Block {
    pub fn id(&self) -> &str {
        match self {
            Block::QueryBar { id, .. }
            | Block::DataView { id, .. }
            | Block::DetailPanel { id, .. }
            | Block::StatSummary { id, .. }
            | Block::EmptyState { id, .. } => id,
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            Block::QueryBar { .. } => BlockType::QueryBar,
            Block::DataView { .. } => BlockType::DataView,
            Block::DetailPanel { .. } => BlockType::DetailPanel,
            Block::StatSummary { .. } => BlockType::StatSummary,
            Block::EmptyState { .. } => BlockType::EmptyState,
        }
    }

    /// Every field key the block refers to, with the role it plays
    pub fn field_refs(&self) -> Vec<FieldRef<'_>> {
        let mut refs = Vec::new();
        match self {
            Block::DataView { config, .. } => {
                refs.extend(config.fields.iter().map(|f| FieldRef::new(FieldRole::Field, f)));
                if let Some(ref sort) = config.sort {
                    refs.push(FieldRef::new(FieldRole::SortField, &sort.field));
                }
                refs.extend(
                    config
                        .filters
                        .iter()
                        .flatten()
                        .map(|f| FieldRef::new(FieldRole::FilterField, &f.field)),
                );
            }
            Block::DetailPanel { config, .. } => {
                refs.extend(config.fields.iter().map(|f| FieldRef::new(FieldRole::Field, f)));
            }
            Block::StatSummary { config, .. } => {
                refs.extend(
                    config
                        .stats
                        .iter()
                        .filter_map(|s| s.field.as_deref())
                        .map(|f| FieldRef::new(FieldRole::StatField, f)),
                );
            }
            Block::QueryBar { .. } | Block::EmptyState { .. } => {}
        }
        refs
    }
}

/// Where inside a block a field key appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    Field,
    SortField,
    FilterField,
    StatField,
}

impl std::fmt::Display for FieldRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRole::Field => write!(f, "field"),
            FieldRole::SortField => write!(f, "sort field"),
            FieldRole::FilterField => write!(f, "filter field"),
            FieldRole::StatField => write!(f, "stat field"),
        }
    }
}

/// A field key referenced from a block config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    pub role: FieldRole,
    pub key: &'a str,
}

impl<'a> FieldRef<'a> {
    fn new(role: FieldRole, key: &'a str) -> Self {
        Self { role, key }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryBarConfig {
    pub enabled: bool,
}

/// How a data view presents its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Table,
    Cards,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Table => write!(f, "table"),
            ViewMode::Cards => write!(f, "cards"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataViewConfig {
    pub mode: ViewMode,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Filter comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    Contains,
    Gt,
    Lt,
    In,
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Contains => "contains",
            FilterOp::Gt => "gt",
            FilterOp::Lt => "lt",
            FilterOp::In => "in",
        };
        write!(f, "{}", s)
    }
}

/// Operand of a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => write!(f, "{}", s),
            FilterValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailPanelConfig {
    pub fields: Vec<String>,
}

/// Aggregate applied by a stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatOp {
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<StatOp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatSummaryConfig {
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyStateConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_tagging() {
        let block: Block = serde_json::from_value(json!({
            "blockType": "statSummary",
            "id": "ss-1",
            "config": { "stats": [{ "label": "Total", "op": "count" }] }
        }))
        .unwrap();
        assert_eq!(block.block_type(), BlockType::StatSummary);
        assert_eq!(block.id(), "ss-1");

        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["blockType"], "statSummary");
        assert!(back["config"]["stats"][0].get("field").is_none());
    }

    #[test]
    fn test_field_refs_cover_all_roles() {
        let block: Block = serde_json::from_value(json!({
            "blockType": "dataView",
            "id": "dv",
            "config": {
                "mode": "table",
                "fields": ["a", "b"],
                "sort": { "field": "c", "direction": "desc" },
                "filters": [{ "field": "d", "op": "in", "value": ["x", "y"] }]
            }
        }))
        .unwrap();
        let refs = block.field_refs();
        let roles: Vec<_> = refs.iter().map(|r| (r.role, r.key)).collect();
        assert_eq!(
            roles,
            vec![
                (FieldRole::Field, "a"),
                (FieldRole::Field, "b"),
                (FieldRole::SortField, "c"),
                (FieldRole::FilterField, "d"),
            ]
        );
    }

    #[test]
    fn test_filter_value_variants() {
        let values: Vec<FilterValue> =
            serde_json::from_value(json!([true, 3, "Lead", ["a", "b"]])).unwrap();
        assert_eq!(
            values,
            vec![
                FilterValue::Bool(true),
                FilterValue::Number(3.0),
                FilterValue::Text("Lead".to_string()),
                FilterValue::List(vec!["a".to_string(), "b".to_string()]),
            ]
        );
    }

    #[test]
    fn test_template_single_record() {
        assert!(Template::Detail.is_single_record());
        assert!(!Template::Dashboard.is_single_record());
    }
}
