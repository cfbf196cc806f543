//! Parsing pipeline: line classification, shape inference, normalization.

pub mod classify;
pub mod normalize;
pub mod types;

pub use classify::{classify, scan_lines};
pub use normalize::{normalize, normalize_scan, Unit, ValueShape};
pub use types::{ClassifiedEntry, FileScan, NormalizedSeries, RawSeries, SeriesValues};

use thiserror::Error;

/// Local parse failures.
///
/// In lenient mode these surface only as diagnostics; strict mode promotes
/// them to errors that abort the importing operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("value {value:?} for key {key:?} is not a valid {expected}")]
    UnparseableValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("key {key:?} has an unrecognized value shape (first value {first:?})")]
    UnrecognizedKeyShape { key: String, first: String },

    #[error("compound value for key {key:?} contains chunk {chunk:?} without '='")]
    MalformedCompoundChunk { key: String, chunk: String },
}
