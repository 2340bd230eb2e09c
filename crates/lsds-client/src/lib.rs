//! lsds-client: the request side of the Lightstep query data source.
//!
//! Builds query API requests for each active dashboard target, sends them
//! through a [`Transport`], surfaces upstream failures and hands the raw
//! responses to [`lsds_core`] for normalisation.
//!
//! ```text
//! DataQueryRequest ──► request body ──► Transport ──► QueryResponse ──► Normalizer ──► DataFrame
//!                  └─► notebook link ────────────────────────────────────────┘
//! ```

pub mod datasource;
pub mod error;
pub mod interval;
pub mod link;
pub mod request;
pub mod transport;

pub use datasource::{DataQueryRequest, DataSource, HealthCheck};
pub use error::{QueryError, TransportError};
pub use request::TimeRange;
pub use transport::{HyperTransport, Transport};
