//! Session import: one folder of rig log files becomes one [`Session`].
//!
//! The designated general file turns into typed [`GeneralMetadata`]; every
//! other regular file runs through the classify/normalize pipeline on its
//! own. Per-file and combined box-plot statistics are computed once at
//! import time and cached on the session.

pub mod metadata;

pub use metadata::{GeneralMetadata, MetaValue, MetadataError};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::{aggregate_all, BoxStats};
use crate::parsers::{normalize_scan, scan_lines, NormalizedSeries, ParseError, SeriesValues};
use crate::progress::Progress;

/// Explicit configuration for an import, threaded through constructors
/// instead of read from ambient state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImportOptions {
    /// Promote per-value and per-key parse degradations to fatal errors
    pub strict: bool,
}

/// Why a session import failed.
///
/// Only these conditions halt an import; data-file parse problems degrade
/// locally unless strict mode promotes them.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("session folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("general file {0:?} not found in session folder")]
    GeneralFileMissing(String),

    #[error("malformed metadata: {0}")]
    MalformedMetadata(#[from] MetadataError),

    /// Strict-mode promotion of a degradable parse condition
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One imported batch of rig log files, immutable after construction.
#[derive(Clone, Debug)]
pub struct Session {
    metadata: GeneralMetadata,
    /// Folder the raw files were read from, for on-demand timeline re-import
    folder: PathBuf,
    files: BTreeMap<String, NormalizedSeries>,
    file_stats: BTreeMap<String, BTreeMap<String, BoxStats>>,
    combined_stats: BTreeMap<String, BoxStats>,
    keys: Vec<String>,
    options: ImportOptions,
}

impl Session {
    /// Canonical session identifier, safe as an archive folder name
    pub fn folder_name(&self) -> String {
        self.metadata.folder_name()
    }

    /// Multi-line human label for chart axes
    pub fn identifier(&self) -> String {
        self.metadata.identifier()
    }

    /// The typed general-file record
    pub fn attributes(&self) -> &GeneralMetadata {
        &self.metadata
    }

    /// Every augmented key observed across all data files, sorted
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Data filenames in this session, sorted
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|name| name.as_str())
    }

    /// Normalized series for one data file
    pub fn file_series(&self, filename: &str) -> Option<&NormalizedSeries> {
        self.files.get(filename)
    }

    /// Cached statistics for one key within one file
    pub fn file_stats(&self, filename: &str, key: &str) -> Option<&BoxStats> {
        self.file_stats.get(filename)?.get(key)
    }

    /// Cached statistics for one key pooled across all files
    pub fn combined_stats(&self, key: &str) -> Option<&BoxStats> {
        self.combined_stats.get(key)
    }

    /// Re-import one named file and keep only the requested keys.
    ///
    /// Used for order-preserving timeline plots, which need the raw series
    /// rather than the cached aggregates. A missing or unreadable file
    /// yields an empty mapping.
    pub fn timeline(&self, keys: &[String], filename: &str) -> NormalizedSeries {
        if !self.files.contains_key(filename) {
            return NormalizedSeries::default();
        }

        let path = self.folder.join(filename);
        match import_data_file(&path, self.options) {
            Ok(Some(series)) => series.filtered(keys),
            Ok(None) | Err(_) => {
                tracing::warn!(file = filename, "timeline re-import failed, returning empty");
                NormalizedSeries::default()
            }
        }
    }

    /// Folder the session was imported from
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

/// Import every regular file in `folder` into a [`Session`].
///
/// The general file is mandatory and parses strictly; a data file that
/// fails to read is logged and skipped. Progress is reported per file.
pub fn import_session(
    folder: &Path,
    general_filename: &str,
    options: ImportOptions,
    progress: &mut dyn Progress,
) -> Result<Session, ImportError> {
    if !folder.is_dir() {
        return Err(ImportError::FolderNotFound(folder.to_path_buf()));
    }

    let mut filenames: Vec<String> = vec![];
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            filenames.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    filenames.sort();

    if !filenames.iter().any(|name| name == general_filename) {
        return Err(ImportError::GeneralFileMissing(general_filename.to_string()));
    }

    // Metadata first: if the general file is malformed the whole session
    // fails and nothing is cached
    let general_text = fs::read_to_string(folder.join(general_filename))?;
    let metadata = GeneralMetadata::parse(&general_text)?;

    progress.begin(filenames.len());
    progress.file_done(general_filename);

    let mut files: BTreeMap<String, NormalizedSeries> = BTreeMap::new();
    let mut file_stats: BTreeMap<String, BTreeMap<String, BoxStats>> = BTreeMap::new();

    for filename in filenames.iter().filter(|name| *name != general_filename) {
        let path = folder.join(filename);
        match import_data_file(&path, options) {
            Ok(Some(series)) => {
                let stats = aggregate_all(&series);
                files.insert(filename.clone(), series);
                file_stats.insert(filename.clone(), stats);
            }
            Ok(None) => {
                tracing::warn!(file = %filename, "data file unreadable, skipped");
            }
            Err(err) => return Err(err.into()),
        }
        progress.file_done(filename);
    }
    progress.finish();

    let combined = combine_series(&files);
    let combined_stats = aggregate_all(&combined);

    let mut keys: Vec<String> = combined.keys().map(str::to_string).collect();
    keys.sort();

    tracing::info!(
        session = %metadata.folder_name(),
        files = files.len(),
        keys = keys.len(),
        "session imported"
    );

    Ok(Session {
        metadata,
        folder: folder.to_path_buf(),
        files,
        file_stats,
        combined_stats,
        keys,
        options,
    })
}

/// Classify and normalize one data file.
///
/// `Ok(None)` means the file could not be read; that degrades to a skip at
/// the call site. Parse errors only escape in strict mode.
fn import_data_file(
    path: &Path,
    options: ImportOptions,
) -> Result<Option<NormalizedSeries>, ParseError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "could not read data file");
            return Ok(None);
        }
    };

    let scan = scan_lines(&text);
    if !scan.unclassified.is_empty() {
        tracing::debug!(
            path = %path.display(),
            lines = scan.unclassified.len(),
            "unclassified lines recorded"
        );
    }

    normalize_scan(&scan, options.strict).map(Some)
}

/// Pool every key's numeric values across all files, skipping files where
/// the key is absent. Text series never pool.
fn combine_series(files: &BTreeMap<String, NormalizedSeries>) -> NormalizedSeries {
    let mut combined = NormalizedSeries::default();
    for series in files.values() {
        for (key, values) in series.iter() {
            combined.insert(key.to_string(), values.clone());
        }
    }
    // Drop pooled text series so keys() only offers aggregatable keys
    combined
        .iter()
        .filter(|(_, values)| matches!(values, SeriesValues::Numbers(_)))
        .map(|(key, values)| (key.to_string(), values.clone()))
        .collect()
}
