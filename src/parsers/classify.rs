//! Line classification for loosely-structured rig logs.
//!
//! A line is a `key: value` record when it contains the separator character;
//! everything before the first `:` is the key, everything after is the value.
//! Lines without a separator are informational output from the rig and only
//! kept for diagnostics.

use super::types::{ClassifiedEntry, FileScan};

/// The key/value separator in rig log lines
pub const SEPARATOR: char = ':';

/// Classify a single line.
///
/// Splits on the first separator only, so values keep any later `:`
/// characters verbatim. Both sides are trimmed.
pub fn classify(line: &str) -> ClassifiedEntry {
    let trimmed = line.trim();
    match trimmed.split_once(SEPARATOR) {
        Some((key, value)) => ClassifiedEntry::Pair {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        },
        None if trimmed.is_empty() => ClassifiedEntry::Blank,
        None => ClassifiedEntry::Unclassified(trimmed.to_string()),
    }
}

/// Classify every line of one file, grouping records by key.
///
/// Unclassified lines are deduplicated per file; repeated banner output from
/// the rig would otherwise flood the bucket.
pub fn scan_lines(text: &str) -> FileScan {
    let mut scan = FileScan::default();

    for line in text.lines() {
        match classify(line) {
            ClassifiedEntry::Pair { key, value } => scan.series.push(&key, value),
            ClassifiedEntry::Unclassified(line) => {
                if !scan.unclassified.contains(&line) {
                    scan.unclassified.push(line);
                }
            }
            ClassifiedEntry::Blank => {}
        }
    }

    scan
}
