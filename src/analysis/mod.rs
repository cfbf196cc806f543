//! Statistical aggregation of normalized series.
//!
//! Each numeric series reduces to a five-number summary with IQR-based
//! outlier detection, matching the conventional box-plot semantics so
//! rendered output lines up with reference plots.

pub mod boxplot;

pub use boxplot::{aggregate_all, box_stats, percentile, Aggregate, BoxStats};

/// Errors that can occur during aggregation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisError {
    /// The series has no values to aggregate
    EmptySeries,
    /// The series holds text values, which have no percentiles
    NotNumeric(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::EmptySeries => write!(f, "cannot aggregate an empty series"),
            AnalysisError::NotNumeric(key) => {
                write!(f, "series {:?} holds text values, not numbers", key)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
