//! Call descriptions and action identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Argument field that carries the correlation key instead of a real argument.
pub const RESERVED_CORRELATION_KEY: &str = "entry_id";

/// Normalized form of a pasted or entered call description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallDescription {
    /// Action identifier in `domain.name` form, when the document named one.
    #[serde(default)]
    pub action_id: Option<String>,
    /// Value captured from the reserved `entry_id` argument.
    #[serde(default)]
    pub correlation_key: Option<String>,
    /// Remaining argument data. Never contains [`RESERVED_CORRELATION_KEY`].
    #[serde(default)]
    pub argument_data: Map<String, Value>,
}

/// Action identifier split into its domain and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionTarget {
    pub domain: String,
    pub name: String,
}

impl ActionTarget {
    /// Split `<domain>.<name>` on the first dot.
    ///
    /// Returns `None` when there is no dot or either side is empty. An
    /// incomplete identifier is a normal intermediate state while a user is
    /// still filling in a form, so it is not an error.
    pub fn parse(identifier: &str) -> Option<Self> {
        let (domain, name) = identifier.split_once('.')?;
        if domain.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            domain: domain.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.name)
    }
}

/// Payload produced by an action picker: `{action: "domain.name", data: ..., target: ...}`.
///
/// Only `action` is interpreted; the other fields are carried so a stored
/// selection survives a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSelection {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}

impl ActionSelection {
    pub fn from_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn action_target(&self) -> Option<ActionTarget> {
        self.action.as_deref().and_then(ActionTarget::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_dot_only() {
        let target = ActionTarget::parse("weather.get.forecasts").expect("valid identifier");
        assert_eq!(target.domain, "weather");
        assert_eq!(target.name, "get.forecasts");
        assert_eq!(target.to_string(), "weather.get.forecasts");
    }

    #[test]
    fn incomplete_identifiers_are_none() {
        assert_eq!(ActionTarget::parse("weather"), None);
        assert_eq!(ActionTarget::parse(".forecasts"), None);
        assert_eq!(ActionTarget::parse("weather."), None);
        assert_eq!(ActionTarget::parse(""), None);
    }

    #[test]
    fn selection_round_trips_through_yaml() {
        let selection: ActionSelection = serde_yaml::from_str("action: light.turn_on\ntarget:\n  entity_id: light.kitchen\n").expect("selection");
        assert_eq!(selection.action_target().map(|target| target.to_string()).as_deref(), Some("light.turn_on"));
        assert!(selection.target.is_some());
        assert_eq!(selection.data, None);
    }
}
