//! # Path Resolution
//!
//! Parses compact dot/bracket path expressions and walks them through nested
//! response values.
//!
//! ## Path Syntax
//!
//! - `forecast.0.temperature` - dot-separated bare tokens
//! - `items[0]`, `items[-1]` - bracketed indices, negative from the end
//! - `["weather.forecast_home"]` - quoted keys, for keys containing dots
//! - `["weather.forecast_home"].forecast[0].temperature` - any mix of the above
//!
//! A bare token is a mapping key when the current value is a mapping and an
//! index when it is a sequence. A quoted key is always a mapping key, even
//! when it looks numeric.
//!
//! ## Usage
//!
//! ```rust
//! use callprobe_engine::resolve::evaluate;
//! use serde_json::json;
//!
//! let response = json!({
//!     "weather.forecast_home": { "forecast": [{ "temperature": 21 }] }
//! });
//!
//! let value = evaluate(&response, Some(r#"["weather.forecast_home"].forecast[0].temperature"#));
//! assert_eq!(value, Some(json!(21)));
//! assert_eq!(evaluate(&response, Some("missing")), None);
//! ```

use callprobe_types::{PathExpression, PathStep};
use serde_json::Value;

/// Evaluates `path` against `root`, returning an owned copy of the addressed value.
///
/// An absent, empty, or whitespace-only path returns `root` unchanged.
/// `None` means the path is malformed, does not resolve, or resolves to null.
pub fn evaluate(root: &Value, path: Option<&str>) -> Option<Value> {
    let Some(path) = path else {
        return Some(root.clone());
    };
    let expression = parse_path(path)?;
    select(root, &expression).cloned()
}

/// Parses a path string into its steps.
///
/// Returns `None` for malformed input: an unterminated `[` or unquoted
/// bracket content that is not an integer. A stray `]` ends the path; the
/// steps before it are kept.
pub fn parse_path(path: &str) -> Option<PathExpression> {
    let trimmed = path.trim();
    let bytes = trimmed.as_bytes();
    let mut steps = Vec::new();
    let mut position = 0usize;

    while position < bytes.len() {
        match bytes[position] {
            b'.' => position += 1,
            b'[' => {
                let close = position + trimmed[position..].find(']')?;
                steps.push(bracket_step(&trimmed[position + 1..close])?);
                position = close + 1;
            }
            b']' => break,
            _ => {
                let rest = &trimmed[position..];
                let token_len = rest.find(['.', '[', ']']).unwrap_or(rest.len());
                steps.push(PathStep::Key(rest[..token_len].to_string()));
                position += token_len;
            }
        }
    }

    Some(PathExpression::new(steps))
}

/// Walks a parsed expression without copying.
///
/// Stops with `None` as soon as a step lands on null; null cannot be
/// traversed further and a null result is reported the same as a miss.
pub fn select<'a>(root: &'a Value, expression: &PathExpression) -> Option<&'a Value> {
    let mut current = root;
    for step in expression.steps() {
        current = apply_step(current, step)?;
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

fn bracket_step(content: &str) -> Option<PathStep> {
    if let Some(key) = strip_matching_quotes(content) {
        return Some(PathStep::QuotedKey(key.to_string()));
    }
    content.trim().parse::<i64>().ok().map(PathStep::Index)
}

fn strip_matching_quotes(content: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        if content.len() >= 2 {
            content.strip_prefix(quote)?.strip_suffix(quote)
        } else {
            None
        }
    })
}

fn apply_step<'a>(current: &'a Value, step: &PathStep) -> Option<&'a Value> {
    match (step, current) {
        (PathStep::QuotedKey(key), Value::Object(map)) => map.get(key),
        (PathStep::Index(index), Value::Array(items)) => items.get(sequence_index(items.len(), *index)?),
        (PathStep::Key(token), Value::Array(items)) => {
            let index = token.trim().parse::<i64>().ok()?;
            items.get(sequence_index(items.len(), index)?)
        }
        (PathStep::Key(key), Value::Object(map)) => map.get(key),
        _ => None,
    }
}

/// Resolves a possibly negative index against a sequence length.
fn sequence_index(len: usize, index: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}
