//! Interactive table state
//!
//! Holds the per-instance state of a data table: column widths, the sort
//! cycle, the active cell and at most one inline edit session. Every
//! user interaction is a discrete method call so the state machine can be
//! driven by any presentation layer (or by tests).
//!
//! Cells are addressed by their *display* position, i.e. the index into
//! [`InteractiveTable::rows_in_view`]. An edit session remembers the
//! underlying data row it was opened on, so a commit lands in the right
//! record even if the sort changes while the editor is open.

pub mod format;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::property::PropertyType;
use crate::core::value::{compare_for_sort, stringify, SortDirection};

pub use format::{format_value, group_thousands, CellAction, FormatSettings, FormattedCell};

/// Width given to columns that do not declare one
pub const DEFAULT_COLUMN_WIDTH: u32 = 200;

/// Lower bound for any column width
pub const MIN_COLUMN_WIDTH: u32 = 80;

#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    pub default_width: u32,
    pub min_width: u32,
    pub format: FormatSettings,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_COLUMN_WIDTH,
            min_width: MIN_COLUMN_WIDTH,
            format: FormatSettings::default(),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub key: String,
    pub label: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl TableColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            property_type: None,
            width: None,
            options: Vec::new(),
        }
    }

    pub fn with_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Declared type, defaulting to text
    pub fn effective_type(&self) -> PropertyType {
        self.property_type.unwrap_or(PropertyType::Text)
    }

    pub fn is_editable(&self) -> bool {
        self.effective_type().is_inline_editable()
    }

    /// Editor a presentation layer should show for this column
    pub fn editor_kind(&self) -> EditorKind {
        match self.effective_type() {
            PropertyType::Select if !self.options.is_empty() => EditorKind::Select(self.options.clone()),
            PropertyType::Boolean => EditorKind::Boolean,
            t if t.is_numeric() => EditorKind::Numeric,
            _ => EditorKind::Text,
        }
    }
}

/// One data row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub values: Map<String, Value>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "camelCase")]
pub enum EditorKind {
    Select(Vec<String>),
    Boolean,
    Numeric,
    Text,
}

/// Keys the inline editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}

/// A cell addressed by display row and column key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub column: String,
}

impl CellRef {
    fn new(row: usize, column: &str) -> Self {
        Self {
            row,
            column: column.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct EditSession {
    data_row: usize,
    column: String,
    buffer: String,
}

#[derive(Debug, Clone)]
struct ResizeGesture {
    column: String,
    start_x: f64,
    start_width: u32,
}

pub struct InteractiveTable {
    columns: Vec<TableColumn>,
    rows: Vec<TableRow>,
    widths: HashMap<String, u32>,
    sort: Option<(String, SortDirection)>,
    /// Data-row indices in display order, refreshed when the sort or data changes
    order: Vec<usize>,
    active: Option<CellRef>,
    editing: Option<EditSession>,
    resize: Option<ResizeGesture>,
    settings: TableSettings,
}

impl InteractiveTable {
    pub fn new(columns: Vec<TableColumn>, rows: Vec<TableRow>, settings: TableSettings) -> Self {
        let widths = columns
            .iter()
            .map(|c| {
                let width = c.width.unwrap_or(settings.default_width).max(settings.min_width);
                (c.key.clone(), width)
            })
            .collect();

        let order = (0..rows.len()).collect();

        Self {
            columns,
            rows,
            widths,
            sort: None,
            order,
            active: None,
            editing: None,
            resize: None,
            settings,
        }
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Rows in storage order, including committed edits
    pub fn data(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TableRow> {
        self.rows
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    // ----- widths -----

    pub fn column_width(&self, key: &str) -> Option<u32> {
        self.widths.get(key).copied()
    }

    /// Start a drag on a column's resize handle
    ///
    /// Returns false if the column is unknown or a gesture is already active.
    pub fn begin_resize(&mut self, key: &str, x: f64) -> bool {
        if self.resize.is_some() {
            return false;
        }
        let Some(start_width) = self.column_width(key) else {
            return false;
        };
        self.resize = Some(ResizeGesture {
            column: key.to_string(),
            start_x: x,
            start_width,
        });
        true
    }

    pub fn drag_to(&mut self, x: f64) {
        let Some(gesture) = &self.resize else {
            return;
        };
        let width = (gesture.start_width as f64 + (x - gesture.start_x)).round();
        let width = width.max(self.settings.min_width as f64) as u32;
        self.widths.insert(gesture.column.clone(), width);
    }

    pub fn end_resize(&mut self) {
        self.resize = None;
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Set a width directly, clamped to the minimum
    pub fn resize_column(&mut self, key: &str, width: u32) -> bool {
        match self.widths.get_mut(key) {
            Some(current) => {
                *current = width.max(self.settings.min_width);
                true
            }
            None => false,
        }
    }

    // ----- sorting -----

    pub fn sort_state(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(k, d)| (k.as_str(), *d))
    }

    /// Cycle the sort for a column: none, asc, desc, none
    pub fn click_header(&mut self, key: &str) {
        if self.column(key).is_none() {
            return;
        }
        self.sort = match self.sort.take() {
            Some((k, SortDirection::Asc)) if k == key => Some((k, SortDirection::Desc)),
            Some((k, SortDirection::Desc)) if k == key => None,
            _ => Some((key.to_string(), SortDirection::Asc)),
        };
        self.refresh_order();
        tracing::debug!(column = key, sort = ?self.sort, "table sort changed");
    }

    fn refresh_order(&mut self) {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        if let Some((key, direction)) = &self.sort {
            let rows = &self.rows;
            order.sort_by(|&a, &b| compare_for_sort(rows[a].get(key), rows[b].get(key), *direction));
        }
        self.order = order;
    }

    pub fn rows_in_view(&self) -> Vec<&TableRow> {
        self.order.iter().map(|&i| &self.rows[i]).collect()
    }

    fn data_index(&self, display_row: usize) -> Option<usize> {
        self.order.get(display_row).copied()
    }

    pub fn cell_value(&self, display_row: usize, key: &str) -> Option<&Value> {
        let index = self.data_index(display_row)?;
        self.rows[index].get(key)
    }

    pub fn formatted_cell(&self, display_row: usize, key: &str) -> Option<FormattedCell> {
        let column = self.column(key)?;
        let index = self.data_index(display_row)?;
        Some(format_value(
            self.rows[index].get(key),
            column.property_type,
            &self.settings.format,
        ))
    }

    // ----- selection and editing -----

    pub fn active_cell(&self) -> Option<&CellRef> {
        self.active.as_ref()
    }

    pub fn click_cell(&mut self, display_row: usize, key: &str) {
        if display_row < self.rows.len() && self.column(key).is_some() {
            self.active = Some(CellRef::new(display_row, key));
        }
    }

    /// Open the inline editor on a cell
    ///
    /// Only text, number, select and boolean columns are editable. Any
    /// editor already open is abandoned without committing.
    pub fn double_click_cell(&mut self, display_row: usize, key: &str) -> bool {
        let editable = self.column(key).is_some_and(TableColumn::is_editable);
        if !editable {
            return false;
        }
        let Some(data_row) = self.data_index(display_row) else {
            return false;
        };

        let buffer = self.rows[data_row].get(key).map(stringify).unwrap_or_default();
        self.active = Some(CellRef::new(display_row, key));
        self.editing = Some(EditSession {
            data_row,
            column: key.to_string(),
            buffer,
        });
        true
    }

    /// Cell currently being edited, by current display position
    pub fn editing_cell(&self) -> Option<CellRef> {
        let session = self.editing.as_ref()?;
        let display_row = self.order.iter().position(|&i| i == session.data_row)?;
        Some(CellRef::new(display_row, &session.column))
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|s| s.buffer.as_str())
    }

    pub fn set_edit_buffer(&mut self, text: impl Into<String>) {
        if let Some(session) = self.editing.as_mut() {
            session.buffer = text.into();
        }
    }

    pub fn key_press(&mut self, key: EditKey) {
        match key {
            EditKey::Enter => {
                self.commit_edit();
            }
            EditKey::Escape => self.cancel_edit(),
        }
    }

    /// Focus left the editor
    pub fn blur(&mut self) {
        self.commit_edit();
    }

    /// Parse the buffer and write it into the row the editor was opened on
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = self.editing.take() else {
            return false;
        };
        let property_type = self
            .column(&session.column)
            .map(TableColumn::effective_type)
            .unwrap_or(PropertyType::Text);
        let value = parse_edit(&session.buffer, property_type);

        let Some(row) = self.rows.get_mut(session.data_row) else {
            return false;
        };
        tracing::debug!(row = %row.id, column = %session.column, "committed cell edit");
        row.values.insert(session.column, value);
        self.refresh_order();
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}

/// Turn an edit buffer into a typed value
fn parse_edit(buffer: &str, property_type: PropertyType) -> Value {
    if property_type.is_numeric() {
        let n = leading_number(buffer).filter(|n| n.is_finite()).unwrap_or(0.0);
        number_value(n)
    } else if property_type == PropertyType::Boolean {
        Value::Bool(buffer == "true")
    } else {
        Value::String(buffer.to_string())
    }
}

/// Parse the longest numeric prefix, so "12abc" reads as 12 and "abc" as nothing
fn leading_number(buffer: &str) -> Option<f64> {
    let text = buffer.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

/// Whole numbers are stored as integers
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> InteractiveTable {
        let columns = vec![
            TableColumn::new("name", "Name"),
            TableColumn::new("score", "Score").with_type(PropertyType::Number),
            TableColumn::new("email", "Email").with_type(PropertyType::Email),
            TableColumn::new("active", "Active").with_type(PropertyType::Boolean),
            TableColumn::new("status", "Status")
                .with_type(PropertyType::Select)
                .with_options(["Lead", "Active"])
                .with_width(120),
        ];
        let rows = vec![
            TableRow::new("r1").with("name", "Alice").with("score", 2),
            TableRow::new("r2").with("name", "Bob").with("score", Value::Null),
            TableRow::new("r3").with("name", "Cara").with("score", 1),
            TableRow::new("r4").with("name", "Dan"),
        ];
        InteractiveTable::new(columns, rows, TableSettings::default())
    }

    fn names(table: &InteractiveTable) -> Vec<String> {
        table
            .rows_in_view()
            .iter()
            .map(|r| stringify(r.get("name").unwrap_or(&Value::Null)))
            .collect()
    }

    #[test]
    fn test_initial_widths() {
        let table = people();
        assert_eq!(table.column_width("name"), Some(DEFAULT_COLUMN_WIDTH));
        assert_eq!(table.column_width("status"), Some(120));
        assert_eq!(table.column_width("missing"), None);
    }

    #[test]
    fn test_resize_gesture_clamps() {
        let mut table = people();
        assert!(table.begin_resize("name", 500.0));
        assert!(!table.begin_resize("score", 10.0), "one gesture at a time");

        table.drag_to(550.0);
        assert_eq!(table.column_width("name"), Some(250));
        table.drag_to(100.0);
        assert_eq!(table.column_width("name"), Some(MIN_COLUMN_WIDTH));
        table.end_resize();
        assert!(!table.is_resizing());

        table.drag_to(900.0);
        assert_eq!(table.column_width("name"), Some(MIN_COLUMN_WIDTH));
    }

    #[test]
    fn test_resize_column_direct() {
        let mut table = people();
        assert!(table.resize_column("score", 10));
        assert_eq!(table.column_width("score"), Some(MIN_COLUMN_WIDTH));
        assert!(!table.resize_column("nope", 300));
    }

    #[test]
    fn test_sort_tri_state() {
        let mut table = people();
        assert_eq!(table.sort_state(), None);
        table.click_header("name");
        assert_eq!(table.sort_state(), Some(("name", SortDirection::Asc)));
        table.click_header("name");
        assert_eq!(table.sort_state(), Some(("name", SortDirection::Desc)));
        table.click_header("name");
        assert_eq!(table.sort_state(), None);

        table.click_header("name");
        table.click_header("score");
        assert_eq!(table.sort_state(), Some(("score", SortDirection::Asc)));
    }

    #[test]
    fn test_sort_nulls_last_and_stable() {
        let mut table = people();
        table.click_header("score");
        assert_eq!(names(&table), vec!["Cara", "Alice", "Bob", "Dan"]);

        table.click_header("score");
        assert_eq!(names(&table), vec!["Alice", "Cara", "Bob", "Dan"]);

        table.click_header("score");
        assert_eq!(names(&table), vec!["Alice", "Bob", "Cara", "Dan"]);
    }

    #[test]
    fn test_click_sets_active_only() {
        let mut table = people();
        table.click_cell(1, "name");
        assert_eq!(table.active_cell(), Some(&CellRef::new(1, "name")));
        assert!(!table.is_editing());

        table.click_cell(99, "name");
        assert_eq!(table.active_cell(), Some(&CellRef::new(1, "name")));
    }

    #[test]
    fn test_edit_cancel_restores_value() {
        let mut table = people();
        assert!(table.double_click_cell(0, "name"));
        assert_eq!(table.edit_buffer(), Some("Alice"));

        table.set_edit_buffer("Alicia");
        table.key_press(EditKey::Escape);

        assert!(!table.is_editing());
        assert_eq!(table.cell_value(0, "name"), Some(&json!("Alice")));
    }

    #[test]
    fn test_enter_and_blur_commit() {
        let mut table = people();
        table.double_click_cell(0, "name");
        table.set_edit_buffer("Alicia");
        table.key_press(EditKey::Enter);
        assert_eq!(table.cell_value(0, "name"), Some(&json!("Alicia")));

        table.double_click_cell(1, "name");
        table.set_edit_buffer("Bobby");
        table.blur();
        assert_eq!(table.cell_value(1, "name"), Some(&json!("Bobby")));
        assert!(!table.is_editing());
    }

    #[test]
    fn test_commit_parses_by_type() {
        let mut table = people();

        table.double_click_cell(0, "score");
        assert_eq!(table.edit_buffer(), Some("2"));
        table.set_edit_buffer("41.5");
        table.commit_edit();
        assert_eq!(table.cell_value(0, "score"), Some(&json!(41.5)));

        table.double_click_cell(0, "score");
        table.set_edit_buffer("12");
        table.commit_edit();
        assert_eq!(table.cell_value(0, "score"), Some(&json!(12)));

        table.double_click_cell(0, "score");
        table.set_edit_buffer("lots");
        table.commit_edit();
        assert_eq!(table.cell_value(0, "score"), Some(&json!(0)));

        table.double_click_cell(0, "active");
        assert_eq!(table.edit_buffer(), Some(""));
        table.set_edit_buffer("true");
        table.commit_edit();
        assert_eq!(table.cell_value(0, "active"), Some(&json!(true)));

        table.double_click_cell(0, "active");
        assert_eq!(table.edit_buffer(), Some("true"));
        table.set_edit_buffer("yes");
        table.commit_edit();
        assert_eq!(table.cell_value(0, "active"), Some(&json!(false)));
    }

    #[test]
    fn test_numeric_commit_reads_leading_number() {
        assert_eq!(parse_edit("12abc", PropertyType::Number), json!(12));
        assert_eq!(parse_edit("  -3.5kg", PropertyType::Currency), json!(-3.5));
        assert_eq!(parse_edit(".5", PropertyType::Number), json!(0.5));
        assert_eq!(parse_edit("7.", PropertyType::Number), json!(7));
        assert_eq!(parse_edit("1e3x", PropertyType::Number), json!(1000));
        assert_eq!(parse_edit("2e", PropertyType::Number), json!(2));
        assert_eq!(parse_edit("abc", PropertyType::Number), json!(0));
        assert_eq!(parse_edit("-", PropertyType::Number), json!(0));
        assert_eq!(parse_edit("", PropertyType::Number), json!(0));
    }

    #[test]
    fn test_commit_resorts_view() {
        let mut table = people();
        table.click_header("score");
        assert_eq!(names(&table), vec!["Cara", "Alice", "Bob", "Dan"]);

        assert!(table.double_click_cell(0, "score"));
        table.set_edit_buffer("5");
        table.commit_edit();
        assert_eq!(names(&table), vec!["Alice", "Cara", "Bob", "Dan"]);
        assert_eq!(table.cell_value(1, "score"), Some(&json!(5)));
    }

    #[test]
    fn test_large_sorted_table_formats_every_cell() {
        let columns = vec![
            TableColumn::new("n", "N").with_type(PropertyType::Number),
            TableColumn::new("label", "Label"),
        ];
        let rows = (0..5000)
            .map(|i| TableRow::new(format!("r{}", i)).with("n", (i * 7919) % 5000).with("label", format!("row {}", i)))
            .collect();
        let mut table = InteractiveTable::new(columns, rows, TableSettings::default());
        table.click_header("n");

        let mut previous = -1;
        for row in 0..table.rows_in_view().len() {
            let value = table.cell_value(row, "n").and_then(Value::as_i64).unwrap();
            assert!(value > previous);
            previous = value;
            assert!(table.formatted_cell(row, "label").is_some());
        }
        assert_eq!(table.formatted_cell(0, "n").unwrap().text, "0");
    }

    #[test]
    fn test_non_editable_column_ignored() {
        let mut table = people();
        assert!(!table.double_click_cell(0, "email"));
        assert!(!table.is_editing());
        assert!(!table.double_click_cell(42, "name"));
    }

    #[test]
    fn test_new_edit_abandons_previous() {
        let mut table = people();
        table.double_click_cell(0, "name");
        table.set_edit_buffer("changed");
        table.double_click_cell(1, "name");
        assert_eq!(table.edit_buffer(), Some("Bob"));
        table.cancel_edit();
        assert_eq!(table.data()[0].get("name"), Some(&json!("Alice")));
    }

    #[test]
    fn test_edit_survives_resort() {
        let mut table = people();
        table.click_header("score");
        // display row 0 is Cara once sorted by score
        assert!(table.double_click_cell(0, "name"));
        assert_eq!(table.edit_buffer(), Some("Cara"));

        table.click_header("score");
        assert_eq!(table.editing_cell(), Some(CellRef::new(1, "name")));

        table.set_edit_buffer("Carla");
        table.commit_edit();
        assert_eq!(table.data()[2].get("name"), Some(&json!("Carla")));
        assert_eq!(table.data()[0].get("name"), Some(&json!("Alice")));
    }

    #[test]
    fn test_editor_kinds() {
        let table = people();
        assert_eq!(
            table.column("status").unwrap().editor_kind(),
            EditorKind::Select(vec!["Lead".to_string(), "Active".to_string()])
        );
        assert_eq!(table.column("active").unwrap().editor_kind(), EditorKind::Boolean);
        assert_eq!(table.column("score").unwrap().editor_kind(), EditorKind::Numeric);
        assert_eq!(table.column("name").unwrap().editor_kind(), EditorKind::Text);
    }

    #[test]
    fn test_formatted_cell() {
        let table = people();
        assert_eq!(table.formatted_cell(0, "score").unwrap().text, "2");
        assert_eq!(table.formatted_cell(1, "score").unwrap().text, "—");
        assert_eq!(table.formatted_cell(3, "email").unwrap().text, "—");
        assert!(table.formatted_cell(0, "missing").is_none());
    }
}
