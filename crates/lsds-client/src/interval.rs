//! Interval strings (`30s`, `5m`, `1h`) → seconds, for the `output-period`
//! request attribute.

use std::sync::OnceLock;

use regex::Regex;

/// The string is neither a plain number nor `<count><unit>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "invalid interval {0:?}: has to be either unit-less or end with one of the following units: \"y, M, w, d, h, m, s, ms\""
)]
pub struct IntervalError(pub String);

fn interval_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)(ms|[Mwdhmsy])").expect("interval pattern is a valid regex")
    })
}

fn unit_seconds(unit: &str) -> Option<f64> {
    Some(match unit {
        "y" => 31_536_000.0,
        "M" => 2_592_000.0,
        "w" => 604_800.0,
        "d" => 86_400.0,
        "h" => 3_600.0,
        "m" => 60.0,
        "s" => 1.0,
        "ms" => 0.001,
        _ => return None,
    })
}

/// Integer part of a decimal string, as a count. `None` if it does not fit
/// in a `u64`.
fn whole_count(text: &str) -> Option<f64> {
    let whole = text.split('.').next()?;
    whole.parse::<u64>().ok().map(|count| count as f64)
}

/// Convert an interval to seconds. A unit-less non-zero number is taken as
/// seconds. Fractional counts are truncated (`1.5m` is 60 seconds).
pub fn interval_to_seconds(interval: &str) -> Result<f64, IntervalError> {
    let text = interval.trim();

    if let Ok(number) = text.parse::<f64>() {
        if number != 0.0 && number.is_finite() {
            return Ok(number.trunc());
        }
    }

    let caps = interval_regex()
        .captures(text)
        .ok_or_else(|| IntervalError(interval.to_string()))?;
    let seconds = unit_seconds(&caps[2]).ok_or_else(|| IntervalError(interval.to_string()))?;
    let count = whole_count(&caps[1]).ok_or_else(|| IntervalError(interval.to_string()))?;
    Ok(seconds * count)
}
