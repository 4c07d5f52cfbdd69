//! Display formatting for changelog values.

use serde_json::Value;

/// Compact JSON longer than this is pretty-printed instead.
const INLINE_JSON_LIMIT: usize = 75;

/// Render one side of a change for display.
///
/// Missing values and `null` read as `N/A`, booleans as `True`/`False`, the
/// empty string is spelled out, and objects and arrays are shown as JSON.
#[must_use]
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(Value::String(s)) if s.is_empty() => "\"\" (empty string)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(composite @ (Value::Array(_) | Value::Object(_))) => {
            let compact = composite.to_string();
            if compact.len() > INLINE_JSON_LIMIT {
                serde_json::to_string_pretty(composite).unwrap_or(compact)
            } else {
                compact
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(format_value(None), "N/A");
        assert_eq!(format_value(Some(&Value::Null)), "N/A");
        assert_eq!(format_value(Some(&json!(true))), "True");
        assert_eq!(format_value(Some(&json!(false))), "False");
        assert_eq!(format_value(Some(&json!(12.5))), "12.5");
        assert_eq!(format_value(Some(&json!("5YJ3"))), "5YJ3");
        assert_eq!(format_value(Some(&json!(""))), "\"\" (empty string)");
    }

    #[test]
    fn test_short_json_stays_inline() {
        assert_eq!(format_value(Some(&json!({"a": 1}))), r#"{"a":1}"#);
        assert_eq!(format_value(Some(&json!([1, 2]))), "[1,2]");
    }

    #[test]
    fn test_long_json_is_pretty_printed() {
        let value = json!({
            "deliveryWindowDisplay": "Oct 20 - Oct 27",
            "deliveryAddressTitle": "Somewhere Delivery Center"
        });
        let text = format_value(Some(&value));
        assert!(text.contains('\n'));
        assert!(text.starts_with("{\n  \"deliveryWindowDisplay\""));
    }
}
