//! Query API request bodies.
//!
//! ```json
//! {
//!   "data": {
//!     "attributes": {
//!       "oldest-time": "2024-01-15T10:00:00Z",
//!       "youngest-time": "2024-01-15T11:00:00Z",
//!       "query": "metric requests | rate",
//!       "input-language": "tql",
//!       "output-period": 60
//!     },
//!     "anonymized_user": "<sha256 of the user's email>",
//!     "grafana_version": "…",
//!     "query_source": "grafana"
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use lsds_core::QueryLanguage;

/// Marks requests as coming from a dashboard data source.
pub const QUERY_SOURCE: &str = "grafana";

/// Dashboard time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// The `duration` leading up to now. `None` if the start would fall
    /// outside the representable date range.
    pub fn last(duration: chrono::Duration) -> Option<Self> {
        let to = Utc::now();
        let from = to.checked_sub_signed(duration)?;
        Some(Self { from, to })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequestBody {
    pub data: QueryRequestData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequestData {
    pub attributes: QueryAttributes,
    pub anonymized_user: String,
    pub grafana_version: String,
    pub query_source: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct QueryAttributes {
    pub oldest_time: DateTime<Utc>,
    pub youngest_time: DateTime<Utc>,
    /// Query text with template variables already interpolated.
    pub query: String,
    pub input_language: QueryLanguage,
    /// Seconds per output point. Whole seconds go on the wire as an integer.
    #[serde(serialize_with = "serialize_period")]
    pub output_period: f64,
}

impl QueryRequestBody {
    pub fn new(
        attributes: QueryAttributes,
        user_email: &str,
        client_version: impl Into<String>,
    ) -> Self {
        Self {
            data: QueryRequestData {
                attributes,
                anonymized_user: anonymize_user(user_email),
                grafana_version: client_version.into(),
                query_source: QUERY_SOURCE,
            },
        }
    }
}

fn serialize_period<S: Serializer>(period: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if period.fract() == 0.0 && period.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*period as i64)
    } else {
        serializer.serialize_f64(*period)
    }
}

/// Lowercase hex SHA-256 of the email. An empty email stays empty.
pub fn anonymize_user(email: &str) -> String {
    if email.is_empty() {
        return String::new();
    }
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Path of the timeseries query endpoint for a project, relative to the
/// data source base URL.
pub fn query_path(project: &str) -> String {
    format!("/projects/{project}/telemetry/query_timeseries")
}
