//! lsds-core: response preprocessing for the Lightstep query data source.
//!
//! This crate turns raw query API responses into host data frames. It does no
//! I/O: every function is a pure transformation of its inputs.
//!
//! # Architecture
//!
//! ```text
//!                 ┌─► timestamps ─┐
//! QueryResponse ──┤   labels ─────┼─► preprocess::timeseries ─┐
//!                 │   naming ─────┘                           ├─► DataFrame
//!                 └─► severity ──────► preprocess::logs ──────┘
//! ```
//!
//! Template-variable interpolation is injected through
//! [`template::TemplateSrv`].

pub mod config;
pub mod frame;
pub mod labels;
pub mod naming;
pub mod preprocess;
pub mod severity;
pub mod template;
pub mod timestamps;
pub mod types;

pub use frame::{DataFrame, DataLink, Field, FieldKind};
pub use preprocess::{normalize, Normalizer};
pub use severity::Level;
pub use types::{Query, QueryLanguage, QueryResponse};
