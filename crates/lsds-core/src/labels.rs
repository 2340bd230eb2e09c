//! Group-label parsing.
//!
//! The query API identifies each series by a list of `key=value` tokens. These
//! are turned into a sorted map so they can be attached to frame fields.

use std::collections::BTreeMap;

/// Label set attached to a frame field.
pub type Labels = BTreeMap<String, String>;

/// Stand-in for an empty label value. Without it the host renders a generic
/// placeholder that is indistinguishable from a missing label.
pub const UNDEFINED_LABEL_VALUE: &str = "<undefined>";

/// Parse `key=value` tokens into a label map.
///
/// Only the first `=` separates key from value, so `compare=true==true`
/// yields `compare → true==true`. Later duplicates of a key win.
pub fn parse_labels<S: AsRef<str>>(tokens: &[S]) -> Labels {
    tokens
        .iter()
        .map(|token| {
            let (key, value) = split_label(token.as_ref());
            (key.to_string(), value.to_string())
        })
        .collect()
}

/// Split a single token on its first `=`, substituting
/// [`UNDEFINED_LABEL_VALUE`] for a missing or empty value.
pub fn split_label(token: &str) -> (&str, &str) {
    match token.split_once('=') {
        Some((key, value)) if !value.is_empty() => (key, value),
        Some((key, _)) => (key, UNDEFINED_LABEL_VALUE),
        None => (token, UNDEFINED_LABEL_VALUE),
    }
}
