//! Template-variable interpolation.
//!
//! Query text and legend templates may reference dashboard variables
//! (`$service`, `${service}`, `[[service]]`). Interpolation is injected into
//! the preprocessors through [`TemplateSrv`] so that callers decide where the
//! variable values come from.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Variables scoped to a single request, e.g. `__interval` or repeat-panel
/// values. They shadow dashboard-level variables of the same name.
pub type ScopedVars = BTreeMap<String, String>;

/// Replaces template-variable references in a string.
///
/// Implementations must be best-effort: unknown references are left as-is and
/// the call never fails.
pub trait TemplateSrv {
    fn replace(&self, text: &str, scoped_vars: &ScopedVars) -> String;
}

impl<T: TemplateSrv + ?Sized> TemplateSrv for &T {
    fn replace(&self, text: &str, scoped_vars: &ScopedVars) -> String {
        (**self).replace(text, scoped_vars)
    }
}

impl<T: TemplateSrv + ?Sized> TemplateSrv for Box<T> {
    fn replace(&self, text: &str, scoped_vars: &ScopedVars) -> String {
        (**self).replace(text, scoped_vars)
    }
}

/// Returns the text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl TemplateSrv for Passthrough {
    fn replace(&self, text: &str, _scoped_vars: &ScopedVars) -> String {
        text.to_string()
    }
}

/// Interpolates `$name`, `${name}` (with an optional `:format` suffix, which
/// is ignored) and `[[name]]` from scoped variables, then dashboard variables.
#[derive(Debug, Clone, Default)]
pub struct VariableInterpolator {
    variables: BTreeMap<String, String>,
}

fn variable_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$(\w+)|\[\[(\w+?)(?::\w+)?\]\]|\$\{(\w+)(?::[^}]+)?\}")
            .expect("variable pattern is a valid regex")
    })
}

impl VariableInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }
}

impl FromIterator<(String, String)> for VariableInterpolator {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

impl TemplateSrv for VariableInterpolator {
    fn replace(&self, text: &str, scoped_vars: &ScopedVars) -> String {
        variable_regex()
            .replace_all(text, |caps: &Captures<'_>| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map_or("", |m| m.as_str());
                scoped_vars
                    .get(name)
                    .or_else(|| self.variables.get(name))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
