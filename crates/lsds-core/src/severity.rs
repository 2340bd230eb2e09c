//! Log severity classification.
//!
//! Log records arrive with severity in several encodings: OpenTelemetry
//! severity numbers, free-text levels (`WARN`, `fatal`) and the query API's
//! own enum spellings (`ErrorSeverity`). All of them are folded into the
//! closed [`Level`] set understood by the host's log viewer.

use serde::Serialize;
use serde_json::Value;

use crate::types::LogRecord;

/// Record fields that may carry severity, checked in this order. The first
/// one present with a non-null value is used.
pub const SEVERITY_FIELDS: [&str; 4] = ["severityNumber", "severityText", "level", "severity"];

/// Canonical log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    Unknown,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Unknown,
    ];

    /// Label text emitted in the `level` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Unknown => "unknown",
        }
    }

    fn from_canonical(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == text)
    }

    /// OpenTelemetry severity-number ranges.
    fn from_severity_number(number: f64) -> Self {
        if number.fract() != 0.0 {
            return Level::Unknown;
        }
        match number as i64 {
            1..=4 => Level::Trace,
            5..=8 => Level::Debug,
            9..=12 => Level::Info,
            13..=16 => Level::Warning,
            17..=20 => Level::Error,
            21..=24 => Level::Critical,
            _ => Level::Unknown,
        }
    }

    fn from_alias(text: &str) -> Self {
        match text {
            "trace" => Level::Trace,
            "debug" | "verboseseverity" => Level::Debug,
            "info" | "infoseverity" => Level::Info,
            "warn" | "warningseverity" => Level::Warning,
            "error" | "errorseverity" => Level::Error,
            "fatal" | "immediateseverity" | "fatalseverity" => Level::Critical,
            _ => Level::Unknown,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw severity value. Never fails: anything unrecognised is
/// [`Level::Unknown`].
pub fn classify_value(value: &Value) -> Level {
    match value {
        Value::String(text) => {
            let text = text.to_lowercase();
            Level::from_canonical(&text).unwrap_or_else(|| Level::from_alias(&text))
        }
        Value::Number(number) => number
            .as_f64()
            .map_or(Level::Unknown, Level::from_severity_number),
        _ => Level::Unknown,
    }
}

/// Locate the severity signal of a record (see [`SEVERITY_FIELDS`]) and
/// classify it. A record without one is treated as severity number `0`.
pub fn classify_level(record: &LogRecord) -> Level {
    let signal = SEVERITY_FIELDS
        .iter()
        .find_map(|field| record.get(*field).filter(|value| !value.is_null()));

    match signal {
        Some(value) => classify_value(value),
        None => classify_value(&Value::from(0)),
    }
}
