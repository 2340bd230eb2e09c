//! Timeseries responses → wide frames.
//!
//! ```text
//! series: [
//!   { "group-labels": ["operation=/get"],  "points": [[0,1], [1,7]] },
//!   { "group-labels": ["operation=/load"], "points": [[0,6], [2,9]] },
//! ]
//!
//! Time                 │ 0 │ 1    │ 2
//! {operation="/get"}   │ 1 │ 7    │ null
//! {operation="/load"}  │ 6 │ null │ 9
//! ```

use serde_json::Value;

use super::Normalizer;
use crate::frame::{DataFrame, DataLink, Field, FieldKind};
use crate::labels::parse_labels;
use crate::naming::build_field_name;
use crate::template::TemplateSrv;
use crate::timestamps::{sorted_timestamps, timestamp_index};
use crate::types::{Query, Series};

pub(crate) const TIME_FIELD: &str = "Time";

impl<T: TemplateSrv> Normalizer<T> {
    pub(crate) fn preprocess_timeseries(
        &self,
        series: Option<&[Series]>,
        query: &Query,
        notebook_url: &str,
    ) -> DataFrame {
        let Some(series) = series else {
            tracing::debug!(ref_id = %query.ref_id, "response has no series; returning empty frame");
            return DataFrame::empty(&query.ref_id);
        };

        let timestamps = sorted_timestamps(series);
        let index = timestamp_index(&timestamps);
        let rows = timestamps.len();

        let mut fields = Vec::with_capacity(series.len() + 1);
        fields.push(Field::new(
            TIME_FIELD,
            FieldKind::Time,
            timestamps.iter().map(|&ts| Value::from(ts)).collect(),
        ));

        for s in series {
            let mut values = vec![Value::Null; rows];
            for point in s.points() {
                if let Some(&row) = index.get(&point.timestamp) {
                    values[row] = point.value.map_or(Value::Null, Value::from);
                }
            }

            let group_labels = s.group_labels();
            let name = build_field_name(
                Some(query.format.as_str()),
                &query.text,
                group_labels,
                &self.templates,
                &self.scoped_vars,
            );

            let mut field = Field::new(name.clone(), FieldKind::Number, values);
            field.display_name = Some(name);
            if !group_labels.is_empty() {
                field.labels = Some(parse_labels(group_labels));
            }
            if !notebook_url.is_empty() {
                field.links.push(DataLink {
                    url: notebook_url.to_string(),
                    title: self.link_title.clone(),
                    target_blank: true,
                });
            }
            fields.push(field);
        }

        tracing::debug!(
            ref_id = %query.ref_id,
            series = series.len(),
            rows,
            "preprocessed timeseries response"
        );

        DataFrame {
            ref_id: query.ref_id.clone(),
            meta: None,
            fields,
        }
    }
}
