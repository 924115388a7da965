//! Stored probe configuration and poll readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::call::ActionSelection;

/// Poll interval applied when a stored entry does not specify one.
pub const DEFAULT_SCAN_INTERVAL_SECONDS: u64 = 300;

/// Attribute name the extracted response is exposed under by default.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "data";

/// A stored probe entry: which action to call, with what arguments, and
/// which part of the response to expose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Display name of the probe.
    #[serde(default)]
    pub name: String,
    /// Action picker payload (`{action: "domain.name"}`).
    #[serde(default)]
    pub service_action: Option<ActionSelection>,
    /// Cleaned argument data as block YAML; empty when there are no arguments.
    #[serde(default)]
    pub service_data_yaml: String,
    /// Poll interval in seconds.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
    /// Path expression applied to each response.
    #[serde(default)]
    pub response_data_path: Option<String>,
    #[serde(default = "default_attribute_name")]
    pub attribute_name: String,
    /// Pre-selector entries stored the action as two separate fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            service_action: None,
            service_data_yaml: String::new(),
            scan_interval: DEFAULT_SCAN_INTERVAL_SECONDS,
            response_data_path: None,
            attribute_name: default_attribute_name(),
            service_domain: None,
            service_name: None,
        }
    }
}

impl ProbeConfig {
    /// The action selection in effect for this entry.
    ///
    /// Falls back to building `domain.name` from the legacy fields when no
    /// selector payload is stored and both legacy fields are non-empty.
    pub fn action_selection(&self) -> Option<ActionSelection> {
        if let Some(selection) = self.service_action.as_ref()
            && selection.action.as_deref().is_some_and(|action| !action.is_empty())
        {
            return Some(selection.clone());
        }
        match (self.service_domain.as_deref(), self.service_name.as_deref()) {
            (Some(domain), Some(name)) if !domain.is_empty() && !name.is_empty() => {
                Some(ActionSelection::from_action(format!("{domain}.{name}")))
            }
            _ => None,
        }
    }
}

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECONDS
}

fn default_attribute_name() -> String {
    DEFAULT_ATTRIBUTE_NAME.to_string()
}

/// Outcome state of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeState {
    Ok,
    Error,
}

impl ProbeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReading {
    pub state: ProbeState,
    /// Extracted value; `None` when the configured path did not resolve.
    pub value: Option<Value>,
    /// Failure message when `state` is [`ProbeState::Error`].
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProbeReading {
    pub fn ok(value: Option<Value>, updated_at: DateTime<Utc>) -> Self {
        Self {
            state: ProbeState::Ok,
            value,
            error: None,
            updated_at,
        }
    }

    pub fn error(message: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            state: ProbeState::Error,
            value: None,
            error: Some(message.into()),
            updated_at,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.state == ProbeState::Ok
    }
}
