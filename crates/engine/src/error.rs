//! Error types for call-description parsing, probe configuration, and transport calls.
//!
//! Every variant maps to a stable translation key so form layers can show a
//! specific, localizable message instead of the raw error text.

use thiserror::Error;

/// The raw text cannot be interpreted as a call description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed YAML: {reason}")]
    Malformed { reason: String },

    #[error("Expected a YAML mapping")]
    NotAMapping,
}

/// A probe entry cannot be turned into a callable action.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No action selected")]
    NoActionSelected,

    #[error("Action not found: {action}")]
    ActionNotFound { action: String },

    #[error("Failed to serialize argument data: {reason}")]
    Serialize { reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure reported by the service-invocation transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Action not found: {action}")]
    NotFound { action: String },

    #[error("Action {action} failed: {message}")]
    CallFailed { action: String, message: String },

    #[error("Unexpected error calling {action}: {message}")]
    Unexpected { action: String, message: String },
}

impl ParseError {
    /// Create a malformed-input error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed { reason: reason.into() }
    }

    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "yaml_parse_error",
            Self::NotAMapping => "yaml_not_dict",
        }
    }
}

impl ConfigError {
    /// Create an action-not-found error.
    pub fn action_not_found(action: impl Into<String>) -> Self {
        Self::ActionNotFound { action: action.into() }
    }

    /// Create an argument serialization error.
    pub fn serialize(reason: impl Into<String>) -> Self {
        Self::Serialize { reason: reason.into() }
    }

    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::Parse(error) => error.translation_key(),
            Self::NoActionSelected => "no_service_selected",
            Self::ActionNotFound { .. } => "service_not_found",
            Self::Serialize { .. } => "yaml_parse_error",
            Self::Transport(error) => error.translation_key(),
        }
    }
}

impl TransportError {
    /// Create a not-found error.
    pub fn not_found(action: impl Into<String>) -> Self {
        Self::NotFound { action: action.into() }
    }

    /// Create a call-failed error.
    pub fn call_failed(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CallFailed {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected-failure error.
    pub fn unexpected(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unexpected {
            action: action.into(),
            message: message.into(),
        }
    }

    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "service_not_found",
            Self::CallFailed { .. } | Self::Unexpected { .. } => "service_call_failed",
        }
    }
}
