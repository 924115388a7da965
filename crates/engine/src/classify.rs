//! Best-effort classification of sampled values.
//!
//! Classification runs an ordered rule table, first match wins, with a
//! catch-all at the end. Booleans are matched before numbers.

use callprobe_types::{ClassificationResult, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::resolve::evaluate;

static TIMESTAMP_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[T ][0-9]{2}:[0-9]{2}:[0-9]{2}").expect("timestamp regex should compile"));

const TIMESTAMP_DEVICE_CLASS: &str = "timestamp";

struct ClassificationRule {
    matches: fn(&Value) -> bool,
    result: fn() -> ClassificationResult,
}

const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        matches: Value::is_null,
        result: text_result,
    },
    ClassificationRule {
        matches: Value::is_boolean,
        result: boolean_result,
    },
    ClassificationRule {
        matches: Value::is_number,
        result: number_result,
    },
    ClassificationRule {
        matches: is_timestamp_text,
        result: timestamp_result,
    },
    ClassificationRule {
        matches: any_value,
        result: text_result,
    },
];

/// Suggests how to interpret a sampled value.
///
/// Composite values are not meaningfully classifiable and fall through to
/// [`ValueKind::Text`].
pub fn classify(value: &Value) -> ClassificationResult {
    RULES
        .iter()
        .find(|rule| (rule.matches)(value))
        .map(|rule| (rule.result)())
        .unwrap_or_else(text_result)
}

/// Extracts `path` from a sample response and classifies the result.
///
/// Returns `None` when the path does not resolve.
pub fn suggest_interpretation(response: &Value, path: Option<&str>) -> Option<ClassificationResult> {
    evaluate(response, path).map(|sample| classify(&sample))
}

/// Converts a loosely typed value to a boolean.
///
/// Accepts booleans, integers (non-zero is true), and the usual on/off words
/// (case-insensitive). Anything else has no boolean reading.
pub fn convert_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Some(integer != 0)
            } else {
                number.as_u64().map(|integer| integer != 0)
            }
        }
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn is_timestamp_text(value: &Value) -> bool {
    value.as_str().is_some_and(|text| TIMESTAMP_PREFIX.is_match(text))
}

fn any_value(_: &Value) -> bool {
    true
}

fn text_result() -> ClassificationResult {
    ClassificationResult::of(ValueKind::Text)
}

fn boolean_result() -> ClassificationResult {
    ClassificationResult::of(ValueKind::Boolean)
}

fn number_result() -> ClassificationResult {
    ClassificationResult::of(ValueKind::Number)
}

fn timestamp_result() -> ClassificationResult {
    ClassificationResult::of(ValueKind::Timestamp).with_device_class(TIMESTAMP_DEVICE_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_is_never_number() {
        assert_eq!(classify(&json!(true)).value_kind, ValueKind::Boolean);
        assert_eq!(classify(&json!(false)).value_kind, ValueKind::Boolean);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(classify(&json!(21)), ClassificationResult::of(ValueKind::Number));
        assert_eq!(classify(&json!(-0.5)), ClassificationResult::of(ValueKind::Number));
    }

    #[test]
    fn test_timestamps() {
        let result = classify(&json!("2024-01-15T10:30:00+00:00"));
        assert_eq!(result.value_kind, ValueKind::Timestamp);
        assert_eq!(result.device_class_hint.as_deref(), Some("timestamp"));
        assert_eq!(result.unit_hint, None);

        assert_eq!(classify(&json!("2024-01-15 10:30:00.123")).value_kind, ValueKind::Timestamp);
        assert_eq!(classify(&json!("2024-01-15")).value_kind, ValueKind::Text);
        assert_eq!(classify(&json!("at 2024-01-15T10:30:00")).value_kind, ValueKind::Text);
    }

    #[test]
    fn test_text_and_fallbacks() {
        assert_eq!(classify(&json!("cheap")), ClassificationResult::of(ValueKind::Text));
        assert_eq!(classify(&Value::Null), ClassificationResult::of(ValueKind::Text));
        assert_eq!(classify(&json!([1, 2])), ClassificationResult::of(ValueKind::Text));
        assert_eq!(classify(&json!({"a": 1})), ClassificationResult::of(ValueKind::Text));
        // Numeric-looking text stays text.
        assert_eq!(classify(&json!("42")).value_kind, ValueKind::Text);
    }

    #[test]
    fn test_suggest_interpretation_follows_path() {
        let response = json!({"prices": [{"start": "2024-01-15T10:00:00", "total": 0.31}]});
        let suggestion = suggest_interpretation(&response, Some("prices[0].total")).expect("resolves");
        assert_eq!(suggestion.value_kind, ValueKind::Number);
        let suggestion = suggest_interpretation(&response, Some("prices.0.start")).expect("resolves");
        assert_eq!(suggestion.value_kind, ValueKind::Timestamp);
        assert_eq!(suggest_interpretation(&response, Some("prices[5]")), None);
    }

    #[test]
    fn test_convert_to_bool() {
        assert_eq!(convert_to_bool(&json!(true)), Some(true));
        assert_eq!(convert_to_bool(&json!(0)), Some(false));
        assert_eq!(convert_to_bool(&json!(7)), Some(true));
        assert_eq!(convert_to_bool(&json!(" Yes ")), Some(true));
        assert_eq!(convert_to_bool(&json!("OFF")), Some(false));
        assert_eq!(convert_to_bool(&json!("maybe")), None);
        assert_eq!(convert_to_bool(&json!(1.5)), None);
        assert_eq!(convert_to_bool(&Value::Null), None);
    }
}
