//! Action resolution for probe entries.
//!
//! A probe form offers two ways to pick the action: an action picker, and
//! pasting a full document that names the action itself. A pasted action
//! wins over the picker.

use callprobe_types::{ActionSelection, ActionTarget, ProbeConfig};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConfigError;
use crate::normalize::{parse_argument_data, parse_call_description, serialize_arguments};

/// A pasted call description reduced to what the form should store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntry {
    pub target: ActionTarget,
    /// Picker payload to store; replaced by the pasted action when one was given.
    pub selection: ActionSelection,
    pub correlation_key: Option<String>,
    pub argument_data: Map<String, Value>,
    /// Argument data re-serialized without the envelope or the correlation key.
    pub service_data_yaml: String,
}

/// A stored entry ready to hand to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub target: ActionTarget,
    pub arguments: Map<String, Value>,
}

/// Picks the action to call.
///
/// A non-empty pasted identifier takes priority and must split into
/// `domain.name`; the picker is only consulted when nothing was pasted.
pub fn resolve_action(pasted: Option<&str>, selected: Option<&ActionSelection>) -> Result<ActionTarget, ConfigError> {
    let target = match pasted.filter(|action| !action.is_empty()) {
        Some(action) => ActionTarget::parse(action),
        None => selected.and_then(ActionSelection::action_target),
    };
    target.ok_or(ConfigError::NoActionSelected)
}

/// Parses pasted text, resolves the action, and re-serializes the cleaned arguments.
pub fn normalize_entry(raw: &str, selected: Option<&ActionSelection>) -> Result<NormalizedEntry, ConfigError> {
    let description = parse_call_description(raw)?;
    let target = resolve_action(description.action_id.as_deref(), selected)?;

    let selection = match description.action_id.as_deref() {
        Some(action) if !action.is_empty() => ActionSelection::from_action(action),
        _ => selected.cloned().unwrap_or_else(|| ActionSelection::from_action(target.to_string())),
    };
    let service_data_yaml = serialize_arguments(&description.argument_data).map_err(|error| ConfigError::serialize(error.to_string()))?;

    debug!("Normalized entry for {}: {} argument(s)", target, description.argument_data.len());

    Ok(NormalizedEntry {
        target,
        selection,
        correlation_key: description.correlation_key,
        argument_data: description.argument_data,
        service_data_yaml,
    })
}

/// Resolves a stored entry into the call the transport should make.
pub fn prepare_call(config: &ProbeConfig) -> Result<PreparedCall, ConfigError> {
    let selection = config.action_selection();
    let target = resolve_action(None, selection.as_ref())?;
    let arguments = parse_argument_data(&config.service_data_yaml)?;
    Ok(PreparedCall { target, arguments })
}
