//! Transport seam and the poll cycle built on it.
//!
//! The engine never invokes actions itself. Hosts implement
//! [`ActionTransport`] and the engine drives it: once to validate a new
//! entry, then once per poll.

use async_trait::async_trait;
use callprobe_types::{ActionSelection, ActionTarget, ProbeConfig, ProbeReading};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::action::{NormalizedEntry, normalize_entry, prepare_call};
use crate::error::{ConfigError, TransportError};
use crate::resolve::evaluate;

/// Invokes an action and returns its response.
#[async_trait]
pub trait ActionTransport: Send + Sync {
    /// Calls `target` with `arguments`. Actions without response data return
    /// `Value::Null`.
    async fn call(&self, target: &ActionTarget, arguments: &Map<String, Value>) -> Result<Value, TransportError>;

    /// Whether the host knows `target` at all.
    fn has_action(&self, _target: &ActionTarget) -> bool {
        true
    }
}

/// Calls the action once to confirm it works with the given arguments.
///
/// A call that succeeds without response data is accepted.
pub async fn validate_call<T>(transport: &T, target: &ActionTarget, arguments: &Map<String, Value>) -> Result<(), TransportError>
where
    T: ActionTransport + ?Sized,
{
    match transport.call(target, arguments).await {
        Ok(Value::Null) => {
            debug!("Action {} called successfully (no response data)", target);
            Ok(())
        }
        Ok(_) => {
            debug!("Action {} called successfully", target);
            Ok(())
        }
        Err(error) => {
            warn!("Action {} call failed during validation: {}", target, error);
            Err(error)
        }
    }
}

/// Full submit path for a probe form: normalize, check the action exists,
/// and make one validation call.
pub async fn check_entry<T>(transport: &T, raw: &str, selected: Option<&ActionSelection>) -> Result<NormalizedEntry, ConfigError>
where
    T: ActionTransport + ?Sized,
{
    let entry = normalize_entry(raw, selected)?;
    if !transport.has_action(&entry.target) {
        return Err(ConfigError::action_not_found(entry.target.to_string()));
    }
    validate_call(transport, &entry.target, &entry.argument_data).await?;
    Ok(entry)
}

/// Runs one poll: call the configured action and extract the configured path.
///
/// Configuration and transport failures produce an error reading. A path
/// that does not resolve produces an ok reading without a value.
pub async fn poll_once<T>(transport: &T, config: &ProbeConfig) -> ProbeReading
where
    T: ActionTransport + ?Sized,
{
    let call = match prepare_call(config) {
        Ok(call) => call,
        Err(error) => {
            warn!("Probe '{}' is misconfigured: {}", config.name, error);
            return ProbeReading::error(error.to_string(), Utc::now());
        }
    };

    match transport.call(&call.target, &call.arguments).await {
        Ok(response) => {
            let value = evaluate(&response, config.response_data_path.as_deref());
            if value.is_none() {
                debug!(
                    "Probe '{}': path {:?} did not resolve in response from {}",
                    config.name, config.response_data_path, call.target
                );
            }
            ProbeReading::ok(value, Utc::now())
        }
        Err(error) => {
            warn!("Probe '{}' poll failed: {}", config.name, error);
            ProbeReading::error(error.to_string(), Utc::now())
        }
    }
}
