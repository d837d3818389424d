//! Field value helpers shared by the renderer and the interactive table

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Literal shown in place of absent or null values
pub const PLACEHOLDER: &str = "—";

/// Sort direction for a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// True for a missing key or an explicit JSON null
pub fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Compare two present values: numbers numerically, strings lexically
///
/// Values of different kinds order by kind (bool < number < string < array
/// < object) so the comparator stays total.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => kind_rank(a)
            .cmp(&kind_rank(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Compare two possibly-absent values for a sort in `direction`
///
/// Absent values sort after every present value in both directions.
pub fn compare_for_sort(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    match (is_absent(a), is_absent(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = match (a, b) {
                (Some(a), Some(b)) => compare_values(a, b),
                _ => Ordering::Equal,
            };
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Plain string form of a value (strings unquoted, null empty)
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// The value itself, or the placeholder string when absent
pub fn or_placeholder(value: Option<&Value>) -> Value {
    match value {
        Some(v) if !v.is_null() => v.clone(),
        _ => Value::String(PLACEHOLDER.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_values() {
        assert!(is_absent(None));
        assert!(is_absent(Some(&Value::Null)));
        assert!(!is_absent(Some(&json!(""))));
        assert!(!is_absent(Some(&json!(0))));
    }

    #[test]
    fn test_numeric_and_lexical_comparison() {
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!("Bo"), &json!("Ann")), Ordering::Greater);
        assert_eq!(compare_values(&json!(1), &json!("1")), Ordering::Less);
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let one = json!(1);
        assert_eq!(
            compare_for_sort(None, Some(&one), SortDirection::Asc),
            Ordering::Greater
        );
        assert_eq!(
            compare_for_sort(None, Some(&one), SortDirection::Desc),
            Ordering::Greater
        );
        assert_eq!(
            compare_for_sort(Some(&Value::Null), None, SortDirection::Desc),
            Ordering::Equal
        );
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("Alice")), "Alice");
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(false)), "false");
        assert_eq!(stringify(&Value::Null), "");
        assert_eq!(stringify(&json!(["a", "b"])), "a, b");
    }

    #[test]
    fn test_or_placeholder() {
        assert_eq!(or_placeholder(None), json!(PLACEHOLDER));
        assert_eq!(or_placeholder(Some(&Value::Null)), json!(PLACEHOLDER));
        assert_eq!(or_placeholder(Some(&json!("x"))), json!("x"));
    }
}
