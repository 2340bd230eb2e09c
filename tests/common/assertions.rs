//! Domain-specific assertion macros for lsds harnesses.
//!
//! These add context-rich failure messages that make it clear which frame
//! property was violated and show the frame's columns when it was.

// ---------------------------------------------------------------------------
// Frame shape assertions
// ---------------------------------------------------------------------------

/// Assert that every field of a `DataFrame` has the same length.
#[macro_export]
macro_rules! assert_rectangular {
    ($frame:expr) => {{
        let frame: &lsds_core::DataFrame = &$frame;
        if !frame.is_rectangular() {
            let lens: Vec<(&str, usize)> = frame
                .fields
                .iter()
                .map(|f| (f.name.as_str(), f.values.len()))
                .collect();
            panic!("assert_rectangular! failed: field lengths differ: {:?}", lens);
        }
    }};
}

/// Assert a frame's field names, in order.
///
/// ```rust
/// assert_field_names!(frame, ["time", "content", "level"]);
/// ```
#[macro_export]
macro_rules! assert_field_names {
    ($frame:expr, [$($name:expr),* $(,)?]) => {{
        let frame: &lsds_core::DataFrame = &$frame;
        let expected: Vec<&str> = vec![$($name),*];
        pretty_assertions::assert_eq!(frame.field_names(), expected, "field names of frame {:?}", frame.ref_id);
    }};
}

// ---------------------------------------------------------------------------
// Column assertions
// ---------------------------------------------------------------------------

/// Assert the values of a named column. Values are written as `json!` input.
///
/// ```rust
/// assert_column!(frame, "Time", [0, 1, 2]);
/// assert_column!(frame, "level", ["info", "warning"]);
/// ```
#[macro_export]
macro_rules! assert_column {
    ($frame:expr, $name:expr, [$($value:tt),* $(,)?]) => {{
        let frame: &lsds_core::DataFrame = &$frame;
        let name: &str = $name;
        let expected: Vec<serde_json::Value> = vec![$(serde_json::json!($value)),*];
        match frame.field(name) {
            Some(field) => pretty_assertions::assert_eq!(field.values, expected, "column {:?}", name),
            None => panic!(
                "assert_column! failed: field {:?} not found.\n  Available: {:?}",
                name,
                frame.field_names()
            ),
        }
    }};
}

/// Assert the kind of a named column.
#[macro_export]
macro_rules! assert_kind {
    ($frame:expr, $name:expr, $kind:expr) => {{
        let frame: &lsds_core::DataFrame = &$frame;
        let name: &str = $name;
        let expected: lsds_core::FieldKind = $kind;
        match frame.field(name) {
            Some(field) if field.kind == expected => {}
            Some(field) => panic!(
                "assert_kind! failed for {:?}:\n  expected: {:?}\n  actual:   {:?}",
                name, expected, field.kind
            ),
            None => panic!(
                "assert_kind! failed: field {:?} not found.\n  Available: {:?}",
                name,
                frame.field_names()
            ),
        }
    }};
}
