//! Implementations of the `lsds` subcommands.

use std::io::Read;
use std::path::Path;

use anyhow::Context;

use lsds_client::interval::interval_to_seconds;
use lsds_client::{DataQueryRequest, DataSource, HealthCheck, HyperTransport, TimeRange};
use lsds_core::config::Config;
use lsds_core::template::{ScopedVars, VariableInterpolator};
use lsds_core::{DataFrame, Normalizer, Query, QueryResponse};

/// Read a raw query API response from a file, or stdin for `-`.
pub fn read_response(path: &Path) -> anyhow::Result<QueryResponse> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading response from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading response from {}", path.display()))?
    };
    serde_json::from_str(&raw).context("decoding query API response")
}

/// Normalise a saved response for `query`.
pub fn normalize_file(
    path: &Path,
    query: &Query,
    link: &str,
    scoped_vars: ScopedVars,
    config: &Config,
) -> anyhow::Result<DataFrame> {
    let response = read_response(path)?;
    let normalizer = Normalizer::new(VariableInterpolator::new())
        .with_scoped_vars(scoped_vars)
        .with_link_title(config.query.link_title.clone());
    Ok(normalizer.normalize(&response, query, link))
}

/// Run queries against the configured proxy.
pub async fn run_query(
    config: Config,
    targets: Vec<Query>,
    range: TimeRange,
    scoped_vars: ScopedVars,
) -> anyhow::Result<Vec<DataFrame>> {
    let transport = HyperTransport::new(config.datasource.url.clone());
    let interval = config.query.interval.clone();
    let ds = DataSource::new(transport, VariableInterpolator::new(), config);
    let request = DataQueryRequest::new(targets, range, interval).with_scoped_vars(scoped_vars);
    Ok(ds.query(&request).await?)
}

/// Check the configured data source.
pub async fn check(config: Config) -> HealthCheck {
    let transport = HyperTransport::new(config.datasource.url.clone());
    DataSource::new(transport, VariableInterpolator::new(), config)
        .test_datasource()
        .await
}

/// Metric names, or the labels of `metric` when one is given.
pub async fn suggestions(config: Config, metric: Option<&str>) -> anyhow::Result<serde_json::Value> {
    let transport = HyperTransport::new(config.datasource.url.clone());
    let ds = DataSource::new(transport, VariableInterpolator::new(), config);
    let payload = match metric {
        Some(metric) => ds.fetch_metric_labels(metric).await?,
        None => ds.fetch_metric_suggestions().await?,
    };
    Ok(payload)
}

/// The time range ending now and reaching back `since` (e.g. `1h`).
pub fn lookback(since: &str) -> anyhow::Result<TimeRange> {
    let seconds = interval_to_seconds(since).context("parsing --since")?;
    let millis = seconds * 1000.0;
    if !(0.0..i64::MAX as f64).contains(&millis) {
        anyhow::bail!("--since {since:?} is out of range");
    }
    chrono::Duration::try_milliseconds(millis as i64)
        .and_then(TimeRange::last)
        .with_context(|| format!("--since {since:?} is out of range"))
}

/// Parse `name=value` pairs given on the command line.
pub fn parse_vars(pairs: &[String]) -> anyhow::Result<ScopedVars> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .with_context(|| format!("variable {pair:?} is not of the form name=value"))
        })
        .collect()
}
