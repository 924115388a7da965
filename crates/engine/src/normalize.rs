//! # Call-Description Normalization
//!
//! Users configure a probe by pasting YAML. Two shapes are accepted:
//!
//! - the full document copied from an action console,
//!   ```yaml
//!   action: tibber_prices.get_chartdata
//!   data:
//!     entry_id: 01KAEWT06A1R2N0CA0YX9V2ZMK
//!     include_level: true
//!   ```
//! - or just the argument mapping (`include_level: true`).
//!
//! Both shapes reduce to a candidate argument mapping first; the reserved
//! `entry_id` key is then stripped from that mapping in one place.

use callprobe_types::{CallDescription, RESERVED_CORRELATION_KEY};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;
use tracing::debug;

use crate::error::ParseError;

const ACTION_KEY: &str = "action";
const LEGACY_ACTION_KEY: &str = "service";
const DATA_KEY: &str = "data";

/// Parses raw YAML into a [`CallDescription`].
///
/// Empty input, and input that parses to nothing, yield an empty description.
///
/// # Errors
///
/// - [`ParseError::Malformed`] when the text is not valid YAML.
/// - [`ParseError::NotAMapping`] when the document, or its `data` section in
///   the full-document form, is not a mapping.
///
/// # Examples
///
/// ```rust
/// use callprobe_engine::normalize::parse_call_description;
/// use serde_json::json;
///
/// let description = parse_call_description("action: dom.svc\ndata:\n  entry_id: XYZ\n  level: true\n")?;
/// assert_eq!(description.action_id.as_deref(), Some("dom.svc"));
/// assert_eq!(description.correlation_key.as_deref(), Some("XYZ"));
/// assert_eq!(description.argument_data.get("level"), Some(&json!(true)));
/// # Ok::<(), callprobe_engine::ParseError>(())
/// ```
pub fn parse_call_description(raw: &str) -> Result<CallDescription, ParseError> {
    let Some(document) = load_document(raw)? else {
        return Ok(CallDescription::default());
    };
    let Value::Object(top_level) = document else {
        return Err(ParseError::NotAMapping);
    };

    let (action_id, mut candidate) = split_envelope(top_level)?;
    let correlation_key = candidate
        .shift_remove(RESERVED_CORRELATION_KEY)
        .and_then(|value| scalar_text(&value));

    debug!(
        "Parsed call description: action={:?}, arguments={}, correlation_key={}",
        action_id,
        candidate.len(),
        correlation_key.is_some()
    );

    Ok(CallDescription {
        action_id,
        correlation_key,
        argument_data: candidate,
    })
}

/// Checks that `raw` would be accepted by [`parse_call_description`] as a
/// document, without splitting it.
pub fn validate_call_description(raw: &str) -> Result<(), ParseError> {
    match load_document(raw)? {
        None | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(ParseError::NotAMapping),
    }
}

/// Loads stored argument YAML as a plain mapping, without envelope detection.
///
/// Stored argument text is already clean, so keys named `action` or
/// `service` are ordinary arguments here.
pub fn parse_argument_data(raw: &str) -> Result<Map<String, Value>, ParseError> {
    match load_document(raw)? {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ParseError::NotAMapping),
    }
}

/// Serializes argument data back to block-style YAML.
///
/// An empty mapping serializes to the empty string, which callers treat as
/// "no arguments configured". Trailing whitespace is dropped unless it belongs
/// to a final block scalar such as `note: |+`.
pub fn serialize_arguments(data: &Map<String, Value>) -> Result<String, serde_yaml::Error> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let rendered = serde_yaml::to_string(data)?;
    let trimmed = rendered.trim_end();
    if parse_argument_data(trimmed).is_ok_and(|reparsed| &reparsed == data) {
        return Ok(trimmed.to_string());
    }
    Ok(rendered)
}

/// Parses YAML text into a nested value. Returns `None` for blank input or a
/// document that parses to null.
pub fn load_document(raw: &str) -> Result<Option<Value>, ParseError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let parsed: YamlValue = serde_yaml::from_str(raw).map_err(|error| ParseError::malformed(error.to_string()))?;
    match yaml_to_json(parsed) {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

/// Coerces a scalar to text. Null has no text form; composites render as
/// compact JSON.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        composite => Some(composite.to_string()),
    }
}

/// Separates the action identifier from the candidate argument mapping.
fn split_envelope(mut top_level: Map<String, Value>) -> Result<(Option<String>, Map<String, Value>), ParseError> {
    if !top_level.contains_key(ACTION_KEY) && !top_level.contains_key(LEGACY_ACTION_KEY) {
        return Ok((None, top_level));
    }

    // An empty `action` falls through to `service`.
    let action_id = [ACTION_KEY, LEGACY_ACTION_KEY]
        .into_iter()
        .filter_map(|key| top_level.get(key))
        .filter_map(scalar_text)
        .find(|text| !text.is_empty());

    let candidate = match top_level.shift_remove(DATA_KEY) {
        None => Map::new(),
        Some(Value::Object(data)) => data,
        Some(_) => return Err(ParseError::NotAMapping),
    };
    Ok((action_id, candidate))
}

fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(flag) => Value::Bool(flag),
        YamlValue::Number(number) => yaml_number_to_json(&number),
        YamlValue::String(text) => Value::String(text),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (mapping_key(key), yaml_to_json(value)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => {
            let tagged = *tagged;
            yaml_to_json(tagged.value)
        }
    }
}

fn yaml_number_to_json(number: &serde_yaml::Number) -> Value {
    if let Some(integer) = number.as_i64() {
        return Value::Number(integer.into());
    }
    if let Some(integer) = number.as_u64() {
        return Value::Number(integer.into());
    }
    // NaN and infinities have no JSON form.
    number
        .as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Mapping keys are text; scalar YAML keys such as `1` or `true` keep their literal form.
fn mapping_key(key: YamlValue) -> String {
    match key {
        YamlValue::String(text) => text,
        YamlValue::Null => "null".to_string(),
        other => scalar_text(&yaml_to_json(other)).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn indented(text: &str) -> String {
        text.lines().map(|line| format!("  {line}\n")).collect()
    }

    #[test]
    fn test_empty_input_is_empty_description() {
        assert_eq!(parse_call_description("").expect("empty"), CallDescription::default());
        assert_eq!(parse_call_description("  \n\t").expect("blank"), CallDescription::default());
        assert_eq!(parse_call_description("~\n").expect("null document"), CallDescription::default());
    }

    #[test]
    fn test_full_document_form() {
        let description = parse_call_description("action: dom.svc\ndata:\n  entry_id: XYZ\n  level: true\n").expect("parse");
        assert_eq!(description.action_id.as_deref(), Some("dom.svc"));
        assert_eq!(description.correlation_key.as_deref(), Some("XYZ"));
        assert_eq!(Value::Object(description.argument_data), json!({"level": true}));
    }

    #[test]
    fn test_bare_data_form() {
        let description = parse_call_description("level: true\n").expect("parse");
        assert_eq!(description.action_id, None);
        assert_eq!(description.correlation_key, None);
        assert_eq!(Value::Object(description.argument_data), json!({"level": true}));
    }

    #[test]
    fn test_bare_data_form_strips_correlation_key() {
        let description = parse_call_description("entry_id: 01KAEWT06A\nlevel: true\n").expect("parse");
        assert_eq!(description.correlation_key.as_deref(), Some("01KAEWT06A"));
        assert!(!description.argument_data.contains_key(RESERVED_CORRELATION_KEY));
    }

    #[test]
    fn test_numeric_correlation_key_is_coerced() {
        let description = parse_call_description("entry_id: 42\n").expect("parse");
        assert_eq!(description.correlation_key.as_deref(), Some("42"));
        assert!(description.argument_data.is_empty());
    }

    #[test]
    fn test_action_preferred_over_service() {
        let description = parse_call_description("action: new.style\nservice: old.style\n").expect("parse");
        assert_eq!(description.action_id.as_deref(), Some("new.style"));

        let description = parse_call_description("service: old.style\n").expect("parse");
        assert_eq!(description.action_id.as_deref(), Some("old.style"));

        let description = parse_call_description("action: ''\nservice: old.style\n").expect("parse");
        assert_eq!(description.action_id.as_deref(), Some("old.style"));
    }

    #[test]
    fn test_full_document_without_data_has_no_arguments() {
        let description = parse_call_description("action: dom.svc\ntarget:\n  entity_id: light.kitchen\n").expect("parse");
        assert_eq!(description.action_id.as_deref(), Some("dom.svc"));
        assert!(description.argument_data.is_empty());
    }

    #[test]
    fn test_non_mapping_data_section() {
        assert_eq!(parse_call_description("action: dom.svc\ndata: [1, 2]\n"), Err(ParseError::NotAMapping));
        assert_eq!(parse_call_description("action: dom.svc\ndata: text\n"), Err(ParseError::NotAMapping));
    }

    #[test]
    fn test_malformed_input() {
        let result = parse_call_description("a: [1, 2\n");
        assert!(matches!(result, Err(ParseError::Malformed { .. })), "got {result:?}");
    }

    #[test]
    fn test_non_mapping_input() {
        assert_eq!(parse_call_description("- 1\n- 2\n"), Err(ParseError::NotAMapping));
        assert_eq!(parse_call_description("just text"), Err(ParseError::NotAMapping));
    }

    #[test]
    fn test_validate_matches_parse_acceptance() {
        assert_eq!(validate_call_description(""), Ok(()));
        assert_eq!(validate_call_description("level: true"), Ok(()));
        assert_eq!(validate_call_description("- 1"), Err(ParseError::NotAMapping));
        assert!(matches!(validate_call_description("a: [1, 2\n"), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_serialize_empty_is_empty_string() {
        assert_eq!(serialize_arguments(&Map::new()).expect("serialize"), "");
    }

    #[test]
    fn test_serialize_uses_block_style_and_keeps_unicode() {
        let Value::Object(data) = json!({"city": "Zürich", "levels": ["low", "high"]}) else {
            unreachable!()
        };
        let rendered = serialize_arguments(&data).expect("serialize");
        assert!(rendered.contains("city: Zürich"), "rendered: {rendered}");
        assert!(rendered.contains("- low"), "rendered: {rendered}");
        assert!(!rendered.contains('{'), "rendered: {rendered}");
        assert_eq!(rendered, rendered.trim_end());
    }

    #[test]
    fn test_round_trip_through_envelope() {
        let Value::Object(data) = json!({
            "include_level": true,
            "resolution": "hourly",
            "limit": 24,
            "ratio": 2.5,
            "literal": "true",
            "tags": ["a", "b"],
            "nested": {"empty": null, "deep": {"x": 1}}
        }) else {
            unreachable!()
        };
        let serialized = serialize_arguments(&data).expect("serialize");
        let raw = format!("action: dom.svc\ndata:\n{}", indented(&serialized));
        let reparsed = parse_call_description(&raw).expect("reparse");
        assert_eq!(reparsed.argument_data, data);

        let bare = parse_call_description(&serialized).expect("reparse bare");
        assert_eq!(bare.argument_data, data);
    }

    #[test]
    fn test_trailing_block_scalar_survives_round_trip() {
        for sample in [
            json!({"note": "a\nb\n"}),
            json!({"note": "a\nb\n\n"}),
            json!({"first": 1, "k": {"z": "a\n"}}),
        ] {
            let Value::Object(data) = sample else { unreachable!() };
            let serialized = serialize_arguments(&data).expect("serialize");

            let bare = parse_argument_data(&serialized).expect("reparse bare");
            assert_eq!(bare, data, "serialized: {serialized:?}");

            let raw = format!("action: dom.svc\ndata:\n{}", indented(&serialized));
            let reparsed = parse_call_description(&raw).expect("reparse envelope");
            assert_eq!(reparsed.argument_data, data, "serialized: {serialized:?}");
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = "action: dom.svc\ndata:\n  b: 1\n  a: 2\n";
        assert_eq!(parse_call_description(raw), parse_call_description(raw));
    }

    #[test]
    fn test_argument_data_keeps_envelope_keys() {
        let data = parse_argument_data("action: dim\nservice: 3\n").expect("arguments");
        assert_eq!(Value::Object(data), json!({"action": "dim", "service": 3}));
        assert!(parse_argument_data("").expect("empty").is_empty());
        assert_eq!(parse_argument_data("- 1"), Err(ParseError::NotAMapping));
    }

    #[test]
    fn test_scalar_yaml_keys_become_text() {
        let data = parse_argument_data("1: one\ntrue: yes\n").expect("arguments");
        assert_eq!(data.get("1"), Some(&json!("one")));
        assert_eq!(data.get("true"), Some(&json!("yes")));
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let data = parse_argument_data("when: !custom 2024-01-15\n").expect("arguments");
        assert_eq!(data.get("when"), Some(&json!("2024-01-15")));
    }
}
