//! Shared type definitions for callprobe.
//!
//! Response and argument payloads are plain `serde_json::Value` trees; the
//! types here describe what gets layered on top of them: parsed path
//! expressions, normalized call descriptions, value classifications, and the
//! stored probe configuration.

pub mod call;
pub mod classification;
pub mod config;
pub mod path;

pub use call::{ActionSelection, ActionTarget, CallDescription, RESERVED_CORRELATION_KEY};
pub use classification::{ClassificationResult, ValueKind};
pub use config::{DEFAULT_ATTRIBUTE_NAME, DEFAULT_SCAN_INTERVAL_SECONDS, ProbeConfig, ProbeReading, ProbeState};
pub use path::{PathExpression, PathStep};

/// Nested argument and response payload.
pub type NestedValue = serde_json::Value;
