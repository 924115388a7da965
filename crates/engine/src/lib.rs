//! # Callprobe Engine
//!
//! The engine turns the response of an arbitrary action call into a polled
//! value. It owns the logic that sits between a user's pasted configuration
//! and a host's service transport.
//!
//! ## Key Features
//!
//! - **Path Resolution**: Dot/bracket path expressions over nested responses
//! - **Call Normalization**: Splits pasted YAML into action, correlation key, and arguments
//! - **Value Classification**: Suggests boolean/number/timestamp/text for a sample value
//! - **Polling**: Drives a host-provided [`ActionTransport`] once per poll
//!
//! ## Usage
//!
//! ```rust
//! use callprobe_engine::{classify, evaluate, parse_call_description};
//! use callprobe_types::ValueKind;
//! use serde_json::json;
//!
//! let description = parse_call_description("action: weather.get_forecasts\ndata:\n  type: hourly\n")?;
//! assert_eq!(description.action_id.as_deref(), Some("weather.get_forecasts"));
//!
//! let response = json!({"weather.home": {"forecast": [{"datetime": "2024-01-15T10:00:00+00:00"}]}});
//! let sample = evaluate(&response, Some(r#"["weather.home"].forecast[0].datetime"#)).expect("resolves");
//! assert_eq!(classify(&sample).value_kind, ValueKind::Timestamp);
//! # Ok::<(), callprobe_engine::ParseError>(())
//! ```
//!
//! ## Architecture
//!
//! - **`resolve`**: path parsing and evaluation
//! - **`normalize`**: YAML call-description parsing and argument serialization
//! - **`classify`**: value classification and boolean coercion
//! - **`action`**: action resolution for form submissions and stored entries
//! - **`transport`**: transport trait, entry validation, and the poll cycle

pub mod action;
pub mod classify;
pub mod error;
pub mod normalize;
pub mod resolve;
pub mod transport;

pub use action::{NormalizedEntry, PreparedCall, normalize_entry, prepare_call, resolve_action};
pub use classify::{classify, convert_to_bool, suggest_interpretation};
pub use error::{ConfigError, ParseError, TransportError};
pub use normalize::{parse_argument_data, parse_call_description, serialize_arguments, validate_call_description};
pub use resolve::{evaluate, parse_path, select};
pub use transport::{ActionTransport, check_entry, poll_once, validate_call};
