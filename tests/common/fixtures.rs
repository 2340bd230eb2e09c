//! Static response corpora used across harnesses.
//!
//! Shapes mirror what the query API returns for timeseries and logs queries,
//! including the odd ones: missing `series`, series with no `points`, `null`
//! log collections and records with tags, OTel severity fields and
//! non-string bodies.

/// Two series with ragged, partially overlapping timestamps.
pub const RESPONSE_RAGGED_SERIES: &str = r#"{
  "data": {
    "attributes": {
      "series": [
        { "group-labels": ["service=api", "customer=Lightstep"], "points": [[0, 1], [1, 7]] },
        { "group-labels": ["service=web", "customer=Lightstep"], "points": [[0, 6], [2, 9]] }
      ]
    }
  }
}"#;

/// A series without labels and without points alongside one with data.
pub const RESPONSE_SPARSE_SERIES: &str = r#"{
  "data": {
    "attributes": {
      "series": [
        { "points": [[1000, 0.5], [2000, null]] },
        { "group-labels": ["region="] }
      ]
    }
  }
}"#;

/// Timeseries response where the API omitted `series` entirely.
pub const RESPONSE_NO_SERIES: &str = r#"{ "data": { "attributes": {} } }"#;

/// Logs response with a `null` collection.
pub const RESPONSE_NULL_LOGS: &str = r#"{ "data": { "attributes": { "logs": null } } }"#;

/// A representative logs response.
pub const RESPONSE_LOGS: &str = r#"{
  "data": {
    "attributes": {
      "logs": [
        [1700000000000, {
          "body": "payment accepted",
          "severityText": "INFO",
          "tags": { "http.status_code": 200, "large_batch": false },
          "trace_id": "abc123"
        }],
        [1700000001000, {
          "event": "retrying upstream",
          "level": "warn",
          "severity": "WARN",
          "tags": { "customer": "Lightstep" }
        }],
        [1700000002000, {
          "Body": { "error": "timeout", "after_ms": 3000 },
          "severityNumber": 17,
          "tags": { "k8s_pod": "api-7f9b4d" },
          "_internal": "dropped"
        }],
        [1700000003000, {}]
      ]
    }
  }
}"#;

/// Synthetic logs response with `lines` records cycling through severities
/// and a rotating set of tag keys. Used for throughput checks.
pub fn logs_high_volume(lines: usize) -> String {
    let levels = ["trace", "debug", "info", "warn", "error", "fatal"];
    let records: Vec<String> = (0..lines)
        .map(|i| {
            format!(
                r#"[{ts}, {{"body": "request {i} handled", "level": "{level}", "tags": {{"shard_{shard}": {i}, "service": "api"}}, "latency_ms": {lat}}}]"#,
                ts = 1_700_000_000_000i64 + i as i64,
                level = levels[i % levels.len()],
                shard = i % 8,
                lat = i % 250,
            )
        })
        .collect();
    format!(
        r#"{{"data": {{"attributes": {{"logs": [{}]}}}}}}"#,
        records.join(",")
    )
}

/// Synthetic timeseries response with `series` series of `points` points each,
/// every other series offset by half a step so timestamps interleave.
pub fn series_high_volume(series: usize, points: usize) -> String {
    let body: Vec<String> = (0..series)
        .map(|s| {
            let offset = if s % 2 == 0 { 0 } else { 30_000 };
            let pts: Vec<String> = (0..points)
                .map(|p| format!("[{}, {}]", p as i64 * 60_000 + offset, (s * p) as f64 / 2.0))
                .collect();
            format!(
                r#"{{"group-labels": ["service=svc-{s}", "zone=z{}"], "points": [{}]}}"#,
                s % 3,
                pts.join(",")
            )
        })
        .collect();
    format!(
        r#"{{"data": {{"attributes": {{"series": [{}]}}}}}}"#,
        body.join(",")
    )
}
