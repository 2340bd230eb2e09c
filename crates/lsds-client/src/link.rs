//! Notebook deep links.
//!
//! Every timeseries field links to a notebook pre-filled with the panel's
//! queries and time range. The click time is left as the host's
//! `${__value.time}` data-link variable so it resolves per point.

use url::Url;

use crate::request::TimeRange;
use lsds_core::{Query, QueryLanguage};

const CHART_TITLE: &str = "Grafana Chart";
const CLICK_MILLIS_PLACEHOLDER: &str = "_click_millis_placeholder_";
const CLICK_MILLIS_VARIABLE: &str = "${__value.time}";

/// Query-string key holding the queries of one language.
fn language_property(language: QueryLanguage) -> &'static str {
    match language {
        QueryLanguage::Tql => "tql_query",
        QueryLanguage::Promql => "promql_query",
    }
}

/// Build the notebook URL for a set of targets.
///
/// `queries` must already have their text interpolated. Each query is added
/// as `<language>_query[i]`, numbered per language in target order.
pub fn notebook_url(
    app_host: &str,
    project: &str,
    queries: &[Query],
    range: &TimeRange,
    plugin_id: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(app_host)?.join(&format!("{project}/notebooks"))?;

    {
        let mut pairs = url.query_pairs_mut();
        let mut tql = 0usize;
        let mut promql = 0usize;
        for query in queries {
            let counter = match query.language {
                QueryLanguage::Tql => &mut tql,
                QueryLanguage::Promql => &mut promql,
            };
            let key = format!("{}[{}]", language_property(query.language), counter);
            *counter += 1;
            pairs.append_pair(&key, &query.text);
        }
        pairs
            .append_pair("title", CHART_TITLE)
            .append_pair("start_micros", &micros(range.from).to_string())
            .append_pair("end_micros", &micros(range.to).to_string())
            .append_pair("click_millis", CLICK_MILLIS_PLACEHOLDER)
            .append_pair("source", plugin_id);
    }

    Ok(url
        .as_str()
        .replace(CLICK_MILLIS_PLACEHOLDER, CLICK_MILLIS_VARIABLE))
}

fn micros(at: chrono::DateTime<chrono::Utc>) -> i64 {
    at.timestamp_millis() * 1000
}
