//! Type-directed cell formatting

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt::Write;
use serde::Serialize;
use serde_json::Value;

use crate::core::property::PropertyType;
use crate::core::value::{stringify, PLACEHOLDER};

/// Settings for value formatting
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSettings {
    /// Prefix for currency values
    pub currency_symbol: String,
    /// chrono format for date fields
    pub date_format: String,
    /// chrono format for datetime fields
    pub datetime_format: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: "%m/%d/%Y".to_string(),
            datetime_format: "%m/%d/%Y, %I:%M:%S %p".to_string(),
        }
    }
}

/// Action a presentation layer can attach to a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "href", rename_all = "camelCase")]
pub enum CellAction {
    OpenLink(String),
    SendEmail(String),
    Call(String),
}

impl CellAction {
    pub fn href(&self) -> &str {
        match self {
            CellAction::OpenLink(href) | CellAction::SendEmail(href) | CellAction::Call(href) => href,
        }
    }
}

/// Display text for a cell plus an optional action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedCell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CellAction>,
}

impl FormattedCell {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
        }
    }

    fn with_action(text: impl Into<String>, action: CellAction) -> Self {
        Self {
            text: text.into(),
            action: Some(action),
        }
    }
}

impl std::fmt::Display for FormattedCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Format a raw value according to its column type
///
/// Columns without a declared type are shown as plain text.
pub fn format_value(
    value: Option<&Value>,
    property_type: Option<PropertyType>,
    settings: &FormatSettings,
) -> FormattedCell {
    let value = match value {
        None | Some(Value::Null) => return FormattedCell::text(PLACEHOLDER),
        Some(v) => v,
    };

    match property_type {
        Some(PropertyType::Date) => FormattedCell::text(format_date(value, &settings.date_format)),
        Some(PropertyType::Datetime) => {
            FormattedCell::text(format_date(value, &settings.datetime_format))
        }
        Some(PropertyType::Boolean) => FormattedCell::text(if truthy(value) { "✓" } else { "✗" }),
        Some(PropertyType::Currency) => match as_number(value) {
            Some(n) => FormattedCell::text(format!("{}{}", settings.currency_symbol, group_thousands(n))),
            None => FormattedCell::text(stringify(value)),
        },
        Some(PropertyType::Number) => match as_number(value) {
            Some(n) => FormattedCell::text(group_thousands(n)),
            None => FormattedCell::text(stringify(value)),
        },
        Some(PropertyType::Multiselect) => FormattedCell::text(stringify(value)),
        Some(PropertyType::Url) => {
            let text = stringify(value);
            FormattedCell::with_action(text.clone(), CellAction::OpenLink(text))
        }
        Some(PropertyType::Email) => {
            let text = stringify(value);
            let href = format!("mailto:{}", text);
            FormattedCell::with_action(text, CellAction::SendEmail(href))
        }
        Some(PropertyType::Phone) => {
            let text = stringify(value);
            let href = format!("tel:{}", text);
            FormattedCell::with_action(text, CellAction::Call(href))
        }
        _ => FormattedCell::text(stringify(value)),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Render a date or datetime value; unparsable values are shown verbatim
fn format_date(value: &Value, format: &str) -> String {
    match value {
        Value::String(s) => {
            let formatted = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                write_formatted(dt.with_timezone(&Local).format(format))
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                write_formatted(dt.format(format))
            } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                write_formatted(date.and_time(NaiveTime::MIN).format(format))
            } else {
                None
            };
            formatted.unwrap_or_else(|| s.clone())
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .and_then(|dt| write_formatted(dt.with_timezone(&Local).format(format)))
            .unwrap_or_else(|| n.to_string()),
        other => stringify(other),
    }
}

/// chrono reports a bad format string as a `fmt::Error` while writing
fn write_formatted(formatted: impl std::fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", formatted).ok()?;
    Some(out)
}

/// True if chrono can format with `format`
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Group the integer part in thousands, keeping up to three decimals
pub fn group_thousands(n: f64) -> String {
    let rounded = format!("{:.3}", n.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if n < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}
