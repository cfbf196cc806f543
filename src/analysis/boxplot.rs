//! Box-plot statistics: percentiles, IQR fences, and outlier partition.

use serde::Serialize;
use std::collections::BTreeMap;

use super::AnalysisError;
use crate::parsers::types::{NormalizedSeries, SeriesValues};

/// Five-number summary of one series after whisker clipping.
///
/// `min <= q1 <= median <= q3 <= max` holds for every constructed value;
/// when outliers exist on an end, that end is the fence value rather than
/// the true extreme.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Aggregate {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Aggregate plus the values it reclassified as outliers
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxStats {
    pub summary: Aggregate,
    /// Values strictly outside the 1.5*IQR fences, ascending
    pub outliers: Vec<f64>,
}

/// Percentile by linear interpolation between closest ranks.
///
/// Expects an ascending slice; returns 0.0 for an empty one.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let fraction = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
    }
}

/// Compute box-plot statistics for one numeric series.
///
/// Values strictly outside the fences become outliers; a value equal to a
/// fence stays in range. When an end has outliers, the reported extreme on
/// that end is the fence value itself.
pub fn box_stats(values: &[f64]) -> Result<BoxStats, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let min = percentile(&sorted, 0.0);
    let q1 = percentile(&sorted, 25.0);
    let median = percentile(&sorted, 50.0);
    let q3 = percentile(&sorted, 75.0);
    let max = percentile(&sorted, 100.0);

    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    // Partition the sorted series at the fences; strict inequality on both
    // sides, so fence-valued data stays inside the whiskers
    let below = sorted.partition_point(|&v| v < lower_fence);
    let within = sorted.partition_point(|&v| v <= upper_fence);

    let mut outliers = Vec::with_capacity(below + sorted.len() - within);
    outliers.extend_from_slice(&sorted[..below]);
    outliers.extend_from_slice(&sorted[within..]);

    let summary = Aggregate {
        min: if below > 0 { lower_fence } else { min },
        q1,
        median,
        q3,
        max: if within < sorted.len() { upper_fence } else { max },
    };

    Ok(BoxStats { summary, outliers })
}

/// Aggregate every numeric series in a normalized map.
///
/// Text and empty series are skipped with a diagnostic; one bad key never
/// aborts the rest.
pub fn aggregate_all(series: &NormalizedSeries) -> BTreeMap<String, BoxStats> {
    let mut out = BTreeMap::new();
    for (key, values) in series.iter() {
        match series_stats(key, values) {
            Ok(stats) => {
                out.insert(key.to_string(), stats);
            }
            Err(err) => tracing::debug!(key, %err, "series skipped during aggregation"),
        }
    }
    out
}

/// Box-plot statistics for one series entry, rejecting text series
pub fn series_stats(key: &str, values: &SeriesValues) -> Result<BoxStats, AnalysisError> {
    let numbers = values
        .numbers()
        .ok_or_else(|| AnalysisError::NotNumeric(key.to_string()))?;
    box_stats(numbers)
}
