//! Value classification results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic kind suggested for a sampled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Boolean,
    Number,
    Timestamp,
    #[serde(rename = "string")]
    Text,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Timestamp => "timestamp",
            Self::Text => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested interpretation of a sampled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub value_kind: ValueKind,
    #[serde(default)]
    pub unit_hint: Option<String>,
    #[serde(default)]
    pub device_class_hint: Option<String>,
}

impl ClassificationResult {
    /// Result with no unit or device class hints.
    pub const fn of(value_kind: ValueKind) -> Self {
        Self {
            value_kind,
            unit_hint: None,
            device_class_hint: None,
        }
    }

    pub fn with_device_class(mut self, device_class: impl Into<String>) -> Self {
        self.device_class_hint = Some(device_class.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_kind_serializes_as_string() {
        let encoded = serde_json::to_string(&ValueKind::Text).expect("serialize");
        assert_eq!(encoded, "\"string\"");
        let decoded: ValueKind = serde_json::from_str("\"timestamp\"").expect("deserialize");
        assert_eq!(decoded, ValueKind::Timestamp);
    }

    #[test]
    fn builder_sets_hints() {
        let result = ClassificationResult::of(ValueKind::Timestamp).with_device_class("timestamp");
        assert_eq!(result.unit_hint, None);
        assert_eq!(result.device_class_hint.as_deref(), Some("timestamp"));
    }
}
