//! Test builders for raw query API responses.
//!
//! These produce the JSON the API would send and decode it through the real
//! `QueryResponse` deserializer, so harnesses exercise shape detection too.
//! They panic on invalid input rather than returning `Result`.

use lsds_core::QueryResponse;
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// SeriesResponseBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for timeseries responses.
///
/// ```rust
/// let response = SeriesResponseBuilder::new()
///     .series(&["service=api"], &[(0, Some(1.0)), (1, None)])
///     .build();
/// ```
#[derive(Default)]
pub struct SeriesResponseBuilder {
    series: Vec<Value>,
}

impl SeriesResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series with labels and `[timestamp, value]` points.
    pub fn series(mut self, labels: &[&str], points: &[(i64, Option<f64>)]) -> Self {
        let points: Vec<Value> = points.iter().map(|(ts, v)| json!([ts, v])).collect();
        self.series.push(json!({ "group-labels": labels, "points": points }));
        self
    }

    /// Add a series the API returned without any `points` key.
    pub fn series_without_points(mut self, labels: &[&str]) -> Self {
        self.series.push(json!({ "group-labels": labels }));
        self
    }

    pub fn to_json(&self) -> Value {
        json!({ "data": { "attributes": { "series": self.series } } })
    }

    pub fn build(self) -> QueryResponse {
        decode(self.to_json())
    }
}

// ---------------------------------------------------------------------------
// LogsResponseBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for logs responses.
///
/// ```rust
/// let response = LogsResponseBuilder::new()
///     .line(1_000, json!({"body": "hello", "level": "info"}))
///     .build();
/// ```
#[derive(Default)]
pub struct LogsResponseBuilder {
    lines: Vec<Value>,
}

impl LogsResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `[timestamp, record]` line. `record` must be a JSON object.
    pub fn line(mut self, timestamp: i64, record: Value) -> Self {
        assert!(record.is_object(), "log record must be an object: {record}");
        self.lines.push(json!([timestamp, record]));
        self
    }

    pub fn to_json(&self) -> Value {
        json!({ "data": { "attributes": { "logs": self.lines } } })
    }

    pub fn build(self) -> QueryResponse {
        decode(self.to_json())
    }
}

/// Build a log record from `(key, value)` pairs, keeping their order.
pub fn record(pairs: &[(&str, Value)]) -> Value {
    let map: Map<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Value::Object(map)
}

/// Decode a raw response, panicking with the payload on failure.
pub fn decode(raw: Value) -> QueryResponse {
    serde_json::from_value(raw.clone())
        .unwrap_or_else(|err| panic!("response did not decode: {err}\n{raw:#}"))
}

/// Decode a raw response from JSON text.
pub fn decode_str(raw: &str) -> QueryResponse {
    serde_json::from_str(raw).unwrap_or_else(|err| panic!("response did not decode: {err}\n{raw}"))
}
