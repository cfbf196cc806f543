//! Log source providers: fill a staging folder with raw session files.
//!
//! The rig-side transfer is an external concern; the core only needs a
//! folder of files. [`LocalSource`] copies from a directory on this
//! machine, which also covers mounted remote shares.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::progress::Progress;

/// Filenames containing this marker are never fetched
const EXCLUDE_MARKER: &str = "exclude";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source directory not found: {0}")]
    DirNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supplier of raw log files into a staging folder
pub trait LogSource {
    /// Copy every available file into `staging`, returning the count
    fn fetch(&self, staging: &Path, progress: &mut dyn Progress) -> Result<usize, SourceError>;
}

/// Source that copies regular files from a local directory
#[derive(Clone, Debug)]
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> LocalSource {
        LocalSource { dir: dir.into() }
    }
}

impl LogSource for LocalSource {
    fn fetch(&self, staging: &Path, progress: &mut dyn Progress) -> Result<usize, SourceError> {
        if !self.dir.is_dir() {
            return Err(SourceError::DirNotFound(self.dir.clone()));
        }

        let mut names: Vec<String> = vec![];
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.contains(EXCLUDE_MARKER) {
                tracing::debug!(file = %name, "excluded from fetch");
                continue;
            }
            names.push(name);
        }
        names.sort();

        fs::create_dir_all(staging)?;
        progress.begin(names.len());
        for name in &names {
            fs::copy(self.dir.join(name), staging.join(name))?;
            progress.file_done(name);
        }
        progress.finish();

        tracing::info!(count = names.len(), staging = %staging.display(), "files staged");
        Ok(names.len())
    }
}
