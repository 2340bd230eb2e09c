//! Logs responses → log frames.
//!
//! Every frame starts with `time`, `content` and `level`. Tags and other
//! record fields become additional fields as they are first seen; the field
//! type is taken from the first value. Rows that lack a field get `null`.
//! Within a record, tag entries are discovered before the record's own
//! top-level fields, so a tag column precedes a field first seen alongside it.
//!
//! ```text
//! logs: [
//!   [1691409972788, { "event": "one", "severity": "ErrorSeverity", "tags": { "large_batch": true } }],
//!   [1691409971908, { "event": "two", "severity": "InfoSeverity",  "tags": { "customer": "hipcore" } }],
//! ]
//!
//! time          │ content │ level │ large_batch │ severity      │ customer
//! 1691409972788 │ one     │ error │ true        │ ErrorSeverity │ null
//! 1691409971908 │ two     │ info  │ null        │ InfoSeverity  │ hipcore
//! ```

use serde_json::{Map, Value};

use crate::frame::{DataFrame, FieldKind, FrameBuilder, FrameMeta};
use crate::severity::classify_level;
use crate::types::{LogLine, LogRecord, Query};

const TIME_FIELD: &str = "time";
const CONTENT_FIELD: &str = "content";
const LEVEL_FIELD: &str = "level";

/// Record fields holding the log body, most preferred first.
const CONTENT_SOURCES: [&str; 3] = ["body", "Body", "event"];

/// Record field holding a nested tag map, flattened into top-level fields.
const TAGS_FIELD: &str = "tags";

/// Convert logs into a frame, one row per record, in input order.
pub fn preprocess_logs(lines: &[LogLine], query: &Query) -> DataFrame {
    let mut frame = FrameBuilder::new(&query.ref_id).with_meta(FrameMeta::logs());
    frame.add_field(TIME_FIELD, FieldKind::Time);
    frame.add_field(CONTENT_FIELD, FieldKind::String);
    frame.add_field(LEVEL_FIELD, FieldKind::String);

    for LogLine { timestamp, record } in lines {
        let mut row = Map::new();
        row.insert(TIME_FIELD.to_string(), Value::from(*timestamp));
        row.insert(CONTENT_FIELD.to_string(), Value::String(content(record)));
        row.insert(
            LEVEL_FIELD.to_string(),
            Value::String(classify_level(record).as_str().to_string()),
        );

        for (key, value) in detected_fields(record) {
            frame.add_field(key, FieldKind::of(value));
            if !row.contains_key(key) {
                row.insert(key.clone(), display_value(value));
            }
        }

        frame.push_row(row);
    }

    tracing::debug!(
        ref_id = %query.ref_id,
        rows = frame.rows(),
        "preprocessed logs response"
    );

    frame.finish()
}

/// The log body: the first present content source, stringified if it is not
/// text, or `""`.
fn content(record: &LogRecord) -> String {
    CONTENT_SOURCES
        .iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
        .map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

/// Fields of a record that become frame fields: tag entries first, then the
/// remaining top-level fields. Content sources, the tag map itself and
/// `_`-prefixed bookkeeping fields are skipped.
fn detected_fields(record: &LogRecord) -> impl Iterator<Item = (&String, &Value)> {
    let tags = record.get(TAGS_FIELD).and_then(Value::as_object);
    let top_level = record.iter().filter(move |(key, value)| {
        !(CONTENT_SOURCES.contains(&key.as_str())
            || key.starts_with('_')
            || (key.as_str() == TAGS_FIELD && value.is_object()))
    });
    tags.into_iter().flatten().chain(top_level)
}

/// Scalars are kept as-is; arrays and objects are stringified so the host can
/// display them.
fn display_value(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        scalar => scalar.clone(),
    }
}
