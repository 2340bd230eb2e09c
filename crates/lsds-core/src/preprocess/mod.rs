//! Preprocessors: turn raw query API responses into [`DataFrame`]s.
//!
//! The response shape is resolved when decoding (see
//! [`Attributes`](crate::types::Attributes)); [`Normalizer::normalize`] routes
//! each shape to its preprocessor:
//!
//! ```text
//! QueryResponse ──► Attributes::Timeseries ──► timeseries::preprocess ──┐
//!               └─► Attributes::Logs ───────► logs::preprocess ────────┴─► DataFrame
//! ```
//!
//! Preprocessing is synchronous and keeps no state between calls; the same
//! inputs always produce the same frame.

mod logs;
mod timeseries;

pub use logs::preprocess_logs;

use crate::frame::DataFrame;
use crate::template::{Passthrough, ScopedVars, TemplateSrv};
use crate::types::{Attributes, Query, QueryResponse};

/// Title of the link attached to timeseries fields.
pub const DEFAULT_LINK_TITLE: &str = "Create a Notebook in Lightstep";

/// Response preprocessing entry point.
///
/// Holds the collaborators the timeseries preprocessor needs to name fields:
/// a [`TemplateSrv`] for legend templates and the request's scoped variables.
#[derive(Debug, Clone)]
pub struct Normalizer<T> {
    templates: T,
    scoped_vars: ScopedVars,
    link_title: String,
}

impl Default for Normalizer<Passthrough> {
    fn default() -> Self {
        Self::new(Passthrough)
    }
}

impl<T: TemplateSrv> Normalizer<T> {
    pub fn new(templates: T) -> Self {
        Self {
            templates,
            scoped_vars: ScopedVars::new(),
            link_title: DEFAULT_LINK_TITLE.to_string(),
        }
    }

    pub fn with_scoped_vars(mut self, scoped_vars: ScopedVars) -> Self {
        self.scoped_vars = scoped_vars;
        self
    }

    pub fn with_link_title(mut self, link_title: impl Into<String>) -> Self {
        self.link_title = link_title.into();
        self
    }

    pub fn templates(&self) -> &T {
        &self.templates
    }

    pub fn scoped_vars(&self) -> &ScopedVars {
        &self.scoped_vars
    }

    /// Convert one response into a frame for `query`.
    ///
    /// `notebook_url` is attached to every timeseries field as a link; pass an
    /// empty string for no link. Logs frames carry no links.
    pub fn normalize(&self, response: &QueryResponse, query: &Query, notebook_url: &str) -> DataFrame {
        match &response.data.attributes {
            Attributes::Logs(lines) => preprocess_logs(lines, query),
            Attributes::Timeseries(series) => {
                self.preprocess_timeseries(series.as_deref(), query, notebook_url)
            }
        }
    }
}

/// [`Normalizer::normalize`] without template-variable interpolation.
pub fn normalize(response: &QueryResponse, query: &Query, notebook_url: &str) -> DataFrame {
    Normalizer::default().normalize(response, query, notebook_url)
}
