//! Error types for the request layer.
//!
//! Transport failures keep the upstream status and payload. When they reach
//! the caller as a [`QueryError`], a payload with a structured `errors` list is
//! reduced to its first message; anything else is passed through unchanged.

use serde_json::Value;

use crate::interval::IntervalError;
use lsds_core::config::ConfigError;

/// Failure talking to the query API.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),
    #[error("request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Non-2xx response. `body` is the decoded JSON payload, or the raw text
    /// as a JSON string if it was not JSON.
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: Value },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            TransportError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Failure running a dashboard query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The first entry of the upstream `errors` list, for display.
    #[error("{message}")]
    Upstream { message: String },
    #[error(transparent)]
    Transport(TransportError),
    #[error(transparent)]
    Interval(#[from] IntervalError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unexpected response shape: {0}")]
    Response(#[source] serde_json::Error),
}

impl From<TransportError> for QueryError {
    fn from(err: TransportError) -> Self {
        match err.body().and_then(first_error_message) {
            Some(message) => QueryError::Upstream { message },
            None => QueryError::Transport(err),
        }
    }
}

/// First message of a `{"errors": [...]}` payload. Non-string entries are
/// rendered as JSON.
pub fn first_error_message(payload: &Value) -> Option<String> {
    let first = payload.get("errors")?.as_array()?.first()?;
    Some(match first {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    })
}
