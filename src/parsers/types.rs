//! Core data types for the log parsing pipeline.
//!
//! Raw text moves through these types in order: lines are classified into
//! [`ClassifiedEntry`] values, grouped per file into a [`RawSeries`], then
//! normalized into a [`NormalizedSeries`] keyed by augmented key.

use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of classifying one line of a source file.
///
/// Splitting uses the first separator only, so a value may itself contain
/// further `:` characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifiedEntry {
    /// A `key: value` record, both sides trimmed.
    Pair { key: String, value: String },
    /// A non-empty line without a separator, kept for diagnostics only.
    Unclassified(String),
    /// Whitespace-only line.
    Blank,
}

/// Raw string values grouped by key, in file order.
///
/// One `RawSeries` per data file. Keys keep their first-seen order so that
/// normalized output is deterministic for a given file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSeries {
    entries: Vec<(String, Vec<String>)>,
}

impl RawSeries {
    /// Append a value under a key, creating the key on first sight
    pub fn push(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key.to_string(), vec![value])),
        }
    }

    /// Values recorded for a key, in file order
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate keys and their values in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of scanning one whole file through the line classifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileScan {
    /// Key/value records grouped by key
    pub series: RawSeries,
    /// Deduplicated lines that carried no separator
    pub unclassified: Vec<String>,
}

/// Storage for one normalized series.
///
/// Numeric series collapse to `f64` regardless of whether the source tokens
/// looked like integers or floats. Non-numeric scalar series pass through as
/// text so the aggregator can skip them explicitly.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesValues {
    Numbers(Vec<f64>),
    Text(Vec<String>),
}

impl SeriesValues {
    /// Numeric values, if this series is numeric
    pub fn numbers(&self) -> Option<&[f64]> {
        match self {
            SeriesValues::Numbers(values) => Some(values),
            SeriesValues::Text(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SeriesValues::Numbers(values) => values.len(),
            SeriesValues::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalized series for one file, keyed by augmented key.
///
/// The augmented key is the original log key plus any inferred ` (unit)`
/// suffix and/or `, subkey` compound sub-field name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedSeries {
    series: BTreeMap<String, SeriesValues>,
}

impl NormalizedSeries {
    /// Insert a series under an augmented key.
    ///
    /// Two raw keys can in principle collapse to the same augmented key; in
    /// that case values of a matching variant are appended to the existing
    /// series rather than replacing it.
    pub fn insert(&mut self, key: String, values: SeriesValues) {
        match self.series.entry(key) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(values);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                match (slot.get_mut(), values) {
                    (SeriesValues::Numbers(existing), SeriesValues::Numbers(more)) => {
                        existing.extend(more)
                    }
                    (SeriesValues::Text(existing), SeriesValues::Text(more)) => {
                        existing.extend(more)
                    }
                    (_, incoming) => {
                        tracing::debug!(
                            key = %slot.key(),
                            "dropping colliding series of mismatched kind ({} values)",
                            incoming.len()
                        );
                    }
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&SeriesValues> {
        self.series.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SeriesValues)> {
        self.series.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// A copy reduced to the requested keys, keeping only keys present here
    pub fn filtered(&self, keys: &[String]) -> NormalizedSeries {
        let series = keys
            .iter()
            .filter_map(|k| self.series.get(k).map(|v| (k.clone(), v.clone())))
            .collect();
        NormalizedSeries { series }
    }
}

impl FromIterator<(String, SeriesValues)> for NormalizedSeries {
    fn from_iter<I: IntoIterator<Item = (String, SeriesValues)>>(iter: I) -> Self {
        let mut out = NormalizedSeries::default();
        for (key, values) in iter {
            out.insert(key, values);
        }
        out
    }
}
