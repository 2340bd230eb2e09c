//! Core types for lsds-core.
//!
//! This module defines the query descriptor handed to the preprocessors and
//! the raw response shapes returned by the Lightstep query API. Responses are
//! decoded with `serde_json`; the attribute bag is resolved into an
//! [`Attributes`] variant at decode time so the preprocessors never have to
//! inspect keys themselves.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Query descriptor
// ---------------------------------------------------------------------------

/// Query language accepted by the query API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    #[default]
    Tql,
    Promql,
}

impl QueryLanguage {
    /// Wire name, as sent in `input-language`.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryLanguage::Tql => "tql",
            QueryLanguage::Promql => "promql",
        }
    }
}

impl std::fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueryLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tql" | "uql" => Ok(QueryLanguage::Tql),
            "promql" => Ok(QueryLanguage::Promql),
            other => Err(format!("unknown query language {other:?} (expected tql or promql)")),
        }
    }
}

/// A single dashboard query target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Query {
    /// Host-assigned query id (`A`, `B`, …). Copied onto the output frame.
    pub ref_id: String,
    /// Query text in [`Query::language`].
    pub text: String,
    pub language: QueryLanguage,
    /// Project to run the query in. Empty means "use the configured project".
    pub project_name: String,
    /// Legend template. May contain template variables and `{{label}}`
    /// placeholders; empty means "derive the name from labels".
    pub format: String,
    /// Hidden targets are never sent upstream.
    pub hide: bool,
}

impl Query {
    pub fn new(ref_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_language(mut self, language: QueryLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_project(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = project_name.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    /// Whether this target should be sent upstream at all.
    pub fn is_active(&self) -> bool {
        !self.hide && !self.text.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Raw responses
// ---------------------------------------------------------------------------

/// Envelope returned by the query API: `{"data": {"attributes": {...}}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse {
    pub data: ResponseData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseData {
    pub attributes: Attributes,
}

/// The attribute bag of a response, resolved by shape.
///
/// A `logs` key selects [`Attributes::Logs`] (a `null` collection decodes as
/// no records). Anything else is a timeseries response, whose `series` may be
/// missing entirely.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub enum Attributes {
    Timeseries(Option<Vec<Series>>),
    Logs(Vec<LogLine>),
}

impl TryFrom<Map<String, Value>> for Attributes {
    type Error = serde_json::Error;

    fn try_from(mut bag: Map<String, Value>) -> Result<Self, Self::Error> {
        if let Some(logs) = bag.remove("logs") {
            let logs: Option<Vec<LogLine>> = serde_json::from_value(logs)?;
            return Ok(Attributes::Logs(logs.unwrap_or_default()));
        }

        let series = match bag.remove("series") {
            Some(series) => serde_json::from_value(series)?,
            None => None,
        };
        Ok(Attributes::Timeseries(series))
    }
}

/// One timeseries, identified by its group labels.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Series {
    /// `key=value` tokens, in the order the API returned them.
    #[serde(rename = "group-labels", default)]
    pub group_labels: Option<Vec<String>>,
    /// The API returns no `points` at all for series without data.
    #[serde(default)]
    pub points: Option<Vec<Point>>,
}

impl Series {
    pub fn group_labels(&self) -> &[String] {
        self.group_labels.as_deref().unwrap_or_default()
    }

    pub fn points(&self) -> &[Point] {
        self.points.as_deref().unwrap_or_default()
    }
}

/// A `[timestamp_millis, value]` pair. A `null` value is kept as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(i64, Option<f64>)")]
pub struct Point {
    pub timestamp: i64,
    pub value: Option<f64>,
}

impl From<(i64, Option<f64>)> for Point {
    fn from((timestamp, value): (i64, Option<f64>)) -> Self {
        Self { timestamp, value }
    }
}

/// Open log record: field name → arbitrary JSON value, in wire order.
pub type LogRecord = Map<String, Value>;

/// A `[timestamp_millis, record]` pair from a logs response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(i64, LogRecord)")]
pub struct LogLine {
    pub timestamp: i64,
    pub record: LogRecord,
}

impl From<(i64, LogRecord)> for LogLine {
    fn from((timestamp, record): (i64, LogRecord)) -> Self {
        Self { timestamp, record }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
