//! Comparison engine: aligned chart-ready data across sessions.
//!
//! Combined mode pairs each selected key with one box-plot slot per session,
//! keeping a slot even when the session lacks the key so chart columns stay
//! aligned. Timeline mode returns each session's raw series for one file.

use serde::Serialize;

use crate::analysis::Aggregate;
use crate::parsers::normalize::{unit_suffix, Unit};
use crate::parsers::NormalizedSeries;
use crate::session::Session;

/// One session's column for one key.
///
/// An absent key yields the sentinel slot (`summary: None`, no outliers)
/// rather than an error, so every key has exactly one slot per session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxSlot {
    pub summary: Option<Aggregate>,
    pub outliers: Vec<f64>,
}

impl BoxSlot {
    fn empty() -> BoxSlot {
        BoxSlot {
            summary: None,
            outliers: vec![],
        }
    }
}

/// Aligned box-plot data for one key across every selected session
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyComparison {
    pub key: String,
    /// Value-axis label derived from the key's unit suffix, if any
    pub axis_label: Option<String>,
    /// One slot per session, in caller-supplied session order
    pub slots: Vec<BoxSlot>,
}

/// Output of combined-mode comparison, ready for a charting consumer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombinedComparison {
    /// One display label per session, the chart's x-axis categories
    pub labels: Vec<String>,
    pub keys: Vec<KeyComparison>,
}

/// One session's panel in a timeline chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelinePanel {
    pub label: String,
    /// Requested keys' series in file order; empty if the session lacks the file
    pub series: NormalizedSeries,
}

/// Output of timeline-mode comparison for one chosen filename
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineComparison {
    pub filename: String,
    pub panels: Vec<TimelinePanel>,
}

/// Value-axis label for an augmented key.
///
/// Units ending in `s` are durations, `Hz` is a rate; keys without a unit
/// suffix get no axis label.
pub fn axis_label(key: &str) -> Option<String> {
    match unit_suffix(key)? {
        Unit::Hertz => Some("Frequency (Hz)".to_string()),
        unit if unit.label().ends_with('s') => Some(format!("Time ({})", unit.label())),
        _ => None,
    }
}

/// Combined mode: per-key aligned aggregates across sessions.
///
/// Sessions are borrowed and never mutated; their cached combined
/// statistics are copied into the output slots.
pub fn compare_combined(sessions: &[&Session], keys: &[String]) -> CombinedComparison {
    let labels = sessions.iter().map(|s| s.identifier()).collect();

    let keys = keys
        .iter()
        .map(|key| {
            let slots = sessions
                .iter()
                .map(|session| match session.combined_stats(key) {
                    Some(stats) => BoxSlot {
                        summary: Some(stats.summary),
                        outliers: stats.outliers.clone(),
                    },
                    None => {
                        tracing::debug!(key = %key, session = %session.folder_name(), "key absent, sentinel slot");
                        BoxSlot::empty()
                    }
                })
                .collect();

            KeyComparison {
                key: key.clone(),
                axis_label: axis_label(key),
                slots,
            }
        })
        .collect();

    CombinedComparison { labels, keys }
}

/// Union of data filenames across the selected sessions, sorted.
///
/// Timeline mode offers these for selection before comparing.
pub fn timeline_filenames(sessions: &[&Session]) -> Vec<String> {
    let mut filenames: Vec<String> = vec![];
    for session in sessions {
        for filename in session.filenames() {
            if !filenames.iter().any(|f| f == filename) {
                filenames.push(filename.to_string());
            }
        }
    }
    filenames.sort();
    filenames
}

/// Timeline mode: each session's filtered series for one chosen file.
///
/// A session lacking the file contributes an empty panel, not an error.
pub fn compare_timeline(
    sessions: &[&Session],
    keys: &[String],
    filename: &str,
) -> TimelineComparison {
    let panels = sessions
        .iter()
        .map(|session| TimelinePanel {
            label: session.identifier(),
            series: session.timeline(keys, filename),
        })
        .collect();

    TimelineComparison {
        filename: filename.to_string(),
        panels,
    }
}
