//! Timestamp alignment for timeseries responses.
//!
//! The query API only returns points where a series has a value, so series in
//! the same response can have different timestamp sets. A wide frame needs a
//! single time axis: the sorted union of every timestamp, plus a lookup from
//! timestamp to row.

use std::collections::{BTreeSet, HashMap};

use crate::types::Series;

/// Timestamp → row position in the aligned time axis.
pub type TimestampIndex = HashMap<i64, usize>;

/// Sorted, deduplicated union of every point timestamp in `series`.
/// Series without points contribute nothing.
pub fn sorted_timestamps(series: &[Series]) -> Vec<i64> {
    series
        .iter()
        .flat_map(|s| s.points())
        .map(|point| point.timestamp)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Map each timestamp to its position. `timestamps` is expected to come from
/// [`sorted_timestamps`].
pub fn timestamp_index(timestamps: &[i64]) -> TimestampIndex {
    timestamps
        .iter()
        .enumerate()
        .map(|(row, &ts)| (ts, row))
        .collect()
}
