//! lsds: Lightstep query data source
//!
//! Command-line front end for the data source crates. The command bodies live
//! here, behind the `lsds` binary, so they can be tested without a process.
//!
//! # Architecture
//!
//! ```text
//! lsds-client (requests, links, errors) ──► lsds-core (preprocessing) ──► DataFrame
//! ```

pub mod commands;
