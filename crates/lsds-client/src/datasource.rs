//! The data source: runs dashboard queries and normalises the responses.
//!
//! One request is issued per active target, all concurrently. If any of them
//! fails the whole query fails (see [`QueryError`] for how upstream errors are
//! surfaced); otherwise each response is normalised against its own target,
//! with a shared notebook link for the panel.

use futures::future::try_join_all;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use crate::error::{QueryError, TransportError};
use crate::interval::interval_to_seconds;
use crate::link::notebook_url;
use crate::request::{query_path, QueryAttributes, QueryRequestBody, TimeRange};
use crate::transport::Transport;
use lsds_core::config::{Config, ConfigError};
use lsds_core::template::{ScopedVars, TemplateSrv};
use lsds_core::{DataFrame, Normalizer, Query, QueryResponse};

/// Characters escaped in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Reported as `grafana_version` when no host version is set.
pub const CLIENT_VERSION: &str = concat!("lsds/", env!("CARGO_PKG_VERSION"));

/// One panel refresh: the targets plus the request-wide options.
#[derive(Debug, Clone)]
pub struct DataQueryRequest {
    pub targets: Vec<Query>,
    pub range: TimeRange,
    /// Output period, e.g. `60s`.
    pub interval: String,
    pub scoped_vars: ScopedVars,
    /// Email of the requesting user; only its hash is sent.
    pub user_email: String,
}

impl DataQueryRequest {
    pub fn new(targets: Vec<Query>, range: TimeRange, interval: impl Into<String>) -> Self {
        Self {
            targets,
            range,
            interval: interval.into(),
            scoped_vars: ScopedVars::new(),
            user_email: String::new(),
        }
    }

    pub fn with_scoped_vars(mut self, scoped_vars: ScopedVars) -> Self {
        self.scoped_vars = scoped_vars;
        self
    }

    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = email.into();
        self
    }

    /// Targets that are sent upstream: non-empty and not hidden.
    pub fn active_targets(&self) -> Vec<&Query> {
        self.targets.iter().filter(|q| q.is_active()).collect()
    }
}

/// Outcome of [`DataSource::test_datasource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub ok: bool,
    pub message: String,
}

impl HealthCheck {
    fn success(message: impl Into<String>) -> Self {
        Self { ok: true, message: message.into() }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { ok: false, message: message.into() }
    }
}

pub struct DataSource<T, S> {
    transport: T,
    templates: S,
    config: Config,
    client_version: String,
}

impl<T: Transport, S: TemplateSrv> DataSource<T, S> {
    pub fn new(transport: T, templates: S, config: Config) -> Self {
        Self {
            transport,
            templates,
            config,
            client_version: CLIENT_VERSION.to_string(),
        }
    }

    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every active target and return one frame per target, in order.
    pub async fn query(&self, request: &DataQueryRequest) -> Result<Vec<DataFrame>, QueryError> {
        let targets = request.active_targets();
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        if targets.iter().any(|query| self.project_for(query).is_empty()) {
            return Err(ConfigError::MissingProjectName.into());
        }
        let output_period = interval_to_seconds(&request.interval)?;
        tracing::info!(targets = targets.len(), output_period, "running queries");

        let responses = try_join_all(
            targets
                .iter()
                .map(|query| self.do_request(query, request, output_period)),
        )
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "query request failed");
            QueryError::from(err)
        })?;

        let link = self.notebook_link(&targets, request);
        let normalizer = Normalizer::new(&self.templates)
            .with_scoped_vars(request.scoped_vars.clone())
            .with_link_title(self.config.query.link_title.clone());

        targets
            .iter()
            .zip(responses)
            .map(|(query, raw)| {
                let response: QueryResponse =
                    serde_json::from_value(raw).map_err(QueryError::Response)?;
                Ok(normalizer.normalize(&response, query, &link))
            })
            .collect()
    }

    async fn do_request(
        &self,
        query: &Query,
        request: &DataQueryRequest,
        output_period: f64,
    ) -> Result<Value, TransportError> {
        let body = QueryRequestBody::new(
            QueryAttributes {
                oldest_time: request.range.from,
                youngest_time: request.range.to,
                query: self.templates.replace(&query.text, &request.scoped_vars),
                input_language: query.language,
                output_period,
            },
            &request.user_email,
            self.client_version.clone(),
        );

        let path = query_path(self.project_for(query));
        tracing::debug!(ref_id = %query.ref_id, %path, "posting query");
        self.transport
            .post_json(&path, &serde_json::to_value(&body)?)
            .await
    }

    fn project_for<'a>(&'a self, query: &'a Query) -> &'a str {
        if query.project_name.is_empty() {
            &self.config.datasource.project_name
        } else {
            &query.project_name
        }
    }

    /// Notebook link for the panel, or `""` if one cannot be built.
    fn notebook_link(&self, targets: &[&Query], request: &DataQueryRequest) -> String {
        let Some(first) = targets.first() else {
            return String::new();
        };
        let interpolated: Vec<Query> = targets
            .iter()
            .map(|query| Query {
                text: self.templates.replace(&query.text, &request.scoped_vars),
                ..(*query).clone()
            })
            .collect();

        notebook_url(
            &self.config.datasource.app_host,
            self.project_for(first),
            &interpolated,
            &request.range,
            &self.config.datasource.plugin_id,
        )
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not build notebook link");
            String::new()
        })
    }

    /// Check the configuration and that the proxy answers.
    pub async fn test_datasource(&self) -> HealthCheck {
        if let Err(err) = self.config.validate() {
            return HealthCheck::error(err.to_string());
        }

        match self.transport.get_json("/test").await {
            Ok(_) => HealthCheck::success("Data source is working"),
            Err(TransportError::Status { status: 403, .. }) => HealthCheck::error("Invalid API key"),
            Err(err) => {
                tracing::error!(error = %err, "data source test failed");
                let message = err
                    .body()
                    .and_then(|body| body.get("message"))
                    .and_then(Value::as_str)
                    .map_or_else(|| err.to_string(), str::to_string);
                HealthCheck::error(message)
            }
        }
    }

    /// Metric names known to the project, for query editors. The payload is
    /// passed through as returned.
    pub async fn fetch_metric_suggestions(&self) -> Result<Value, QueryError> {
        Ok(self.transport.get_json("/telemetry_suggestions").await?)
    }

    /// Label keys and values of one metric, for query editors.
    pub async fn fetch_metric_labels(&self, metric: &str) -> Result<Value, QueryError> {
        let metric = utf8_percent_encode(metric, PATH_SEGMENT);
        Ok(self
            .transport
            .get_json(&format!("/telemetry_labels/{metric}"))
            .await?)
    }
}
