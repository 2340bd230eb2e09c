//! Display names for timeseries fields.
//!
//! A field is named from, in order of preference: the query's legend template
//! (followed by the label set), the label set alone, or the raw query text.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::labels::{parse_labels, UNDEFINED_LABEL_VALUE};
use crate::template::{ScopedVars, TemplateSrv};

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*(.+?)\s*\}\}").expect("placeholder pattern is a valid regex")
    })
}

/// Render group labels as `{a="1", b="2"}`, sorted by token. Empty input
/// yields an empty string.
pub fn format_labels<S: AsRef<str>>(group_labels: &[S]) -> String {
    if group_labels.is_empty() {
        return String::new();
    }

    let mut tokens: Vec<&str> = group_labels.iter().map(|s| s.as_ref()).collect();
    tokens.sort_unstable();

    let quoted: Vec<String> = tokens
        .iter()
        .map(|token| format!("{}\"", token.replacen('=', "=\"", 1)))
        .collect();
    format!("{{{}}}", quoted.join(", "))
}

/// Replace every `{{key}}` in `text` with that label's value, or
/// [`UNDEFINED_LABEL_VALUE`] when the series has no such label.
pub fn substitute_label_placeholders<S: AsRef<str>>(text: &str, group_labels: &[S]) -> String {
    let labels = parse_labels(group_labels);
    placeholder_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            labels
                .get(&caps[1])
                .map_or(UNDEFINED_LABEL_VALUE, String::as_str)
                .to_string()
        })
        .into_owned()
}

/// Build the display name of a series.
///
/// With a non-empty `template`, template variables are interpolated first and
/// `{{label}}` placeholders second; the formatted label set is appended after
/// a space when the series has labels. Without a template the formatted label
/// set is used, falling back to `query_text`.
pub fn build_field_name<T, S>(
    template: Option<&str>,
    query_text: &str,
    group_labels: &[S],
    templates: &T,
    scoped_vars: &ScopedVars,
) -> String
where
    T: TemplateSrv + ?Sized,
    S: AsRef<str>,
{
    let formatted_labels = format_labels(group_labels);

    if let Some(template) = template.filter(|t| !t.is_empty()) {
        let interpolated = templates.replace(template, scoped_vars);
        let mut name = substitute_label_placeholders(&interpolated, group_labels);
        if !formatted_labels.is_empty() {
            name.push(' ');
            name.push_str(&formatted_labels);
        }
        return name;
    }

    if !formatted_labels.is_empty() {
        return formatted_labels;
    }

    query_text.to_string()
}
