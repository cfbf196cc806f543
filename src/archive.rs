//! Archive store: sessions persisted across runs.
//!
//! Archived session folders live under `<data_dir>/archive/<folder_name>`,
//! indexed by `index.json`. The index is versioned and backed up once per
//! run before its first mutation. Sessions themselves are re-imported from
//! their raw files on open; there is no binary session persistence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::progress::{NoProgress, Progress};
use crate::session::{import_session, ImportError, ImportOptions, Session};

/// Archive subdirectory under the data dir
const ARCHIVE_DIR: &str = "archive";

/// Index file name
const INDEX_FILE: &str = "index.json";

/// Backup suffix for the pre-mutation index copy
const BACKUP_SUFFIX: &str = "bak";

/// Listing values longer than this are truncated for display
const LIST_VALUE_WIDTH: usize = 30;

/// Columns of the session listing, in display order
pub const LIST_HEADERS: [&str; 6] = [
    "ID",
    "TIME",
    "VERSION",
    "COMMENT",
    "LIVE_FEED",
    "RECORDING_FOLDER",
];

/// Errors from archive operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("a session named {0:?} is already archived")]
    AlreadyArchived(String),

    #[error("no session named {0:?} in the archive")]
    UnknownSession(String),

    #[error("failed to parse archive index: {0}")]
    BadIndex(#[from] serde_json::Error),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// On-disk index of archived sessions
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct ArchiveIndex {
    #[serde(default = "default_index_version")]
    version: u32,
    /// Session identifiers in archival order; each is also its folder name
    sessions: Vec<String>,
}

fn default_index_version() -> u32 {
    1
}

/// The archive of imported sessions.
///
/// Opening the archive loads the index and re-imports every listed session
/// from its raw files, so parser improvements apply without a migration
/// step.
pub struct Archive {
    archive_dir: PathBuf,
    index_path: PathBuf,
    index: ArchiveIndex,
    sessions: Vec<Session>,
    general_filename: String,
    options: ImportOptions,
    backed_up: bool,
}

impl Archive {
    /// Open (or create) the archive under `data_dir`.
    ///
    /// Sessions whose folders have disappeared are dropped from the index
    /// with a warning rather than failing the open.
    pub fn open(
        data_dir: &Path,
        general_filename: &str,
        options: ImportOptions,
    ) -> Result<Archive, ArchiveError> {
        let archive_dir = data_dir.join(ARCHIVE_DIR);
        fs::create_dir_all(&archive_dir)?;
        let index_path = data_dir.join(INDEX_FILE);

        let index: ArchiveIndex = if index_path.exists() {
            serde_json::from_str(&fs::read_to_string(&index_path)?)?
        } else {
            ArchiveIndex {
                version: 1,
                sessions: vec![],
            }
        };

        let mut archive = Archive {
            archive_dir,
            index_path,
            index,
            sessions: vec![],
            general_filename: general_filename.to_string(),
            options,
            backed_up: false,
        };

        let ids: Vec<String> = archive.index.sessions.clone();
        let mut kept: Vec<String> = vec![];
        for id in ids {
            let folder = archive.archive_dir.join(&id);
            match import_session(&folder, &archive.general_filename, options, &mut NoProgress) {
                Ok(session) => {
                    kept.push(id);
                    archive.sessions.push(session);
                }
                Err(err) => {
                    tracing::warn!(session = %id, %err, "archived session failed to load, dropped from index");
                }
            }
        }
        if kept.len() != archive.index.sessions.len() {
            archive.index.sessions = kept;
            archive.save_index()?;
        }

        tracing::info!(count = archive.sessions.len(), "archive opened");
        Ok(archive)
    }

    /// All archived sessions, in archival order
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Sessions for the given identifiers, in the order requested
    pub fn get(&self, ids: &[String]) -> Result<Vec<&Session>, ArchiveError> {
        ids.iter()
            .map(|id| {
                self.sessions
                    .iter()
                    .find(|s| s.folder_name() == *id)
                    .ok_or_else(|| ArchiveError::UnknownSession(id.clone()))
            })
            .collect()
    }

    /// Import the session in `staging`, then move the folder into the
    /// archive under its canonical name.
    ///
    /// The staging folder is only moved after a successful import, so a
    /// malformed session leaves it untouched for inspection. Returns the
    /// new session's identifier.
    pub fn import_staged(
        &mut self,
        staging: &Path,
        progress: &mut dyn Progress,
    ) -> Result<String, ArchiveError> {
        let session = import_session(staging, &self.general_filename, self.options, progress)?;

        let id = session.folder_name();
        let target = self.archive_dir.join(&id);
        if target.exists() || self.index.sessions.contains(&id) {
            return Err(ArchiveError::AlreadyArchived(id));
        }

        fs::rename(staging, &target)?;

        // Re-import from the archived location so the cached session points
        // at the folder that will still exist next run
        let session = import_session(&target, &self.general_filename, self.options, &mut NoProgress)?;

        self.index.sessions.push(id.clone());
        self.save_index()?;
        self.sessions.push(session);

        tracing::info!(session = %id, "session archived");
        Ok(id)
    }

    /// Rebuild every session from the folders actually present in the
    /// archive directory, replacing the index. Used after parser upgrades
    /// or manual archive surgery.
    pub fn reimport_all(&mut self, progress: &mut dyn Progress) -> Result<usize, ArchiveError> {
        let mut folders: Vec<String> = vec![];
        for entry in fs::read_dir(&self.archive_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                folders.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        folders.sort();

        let mut sessions = vec![];
        let mut ids = vec![];
        progress.begin(folders.len());
        for folder in &folders {
            let path = self.archive_dir.join(folder);
            match import_session(&path, &self.general_filename, self.options, &mut NoProgress) {
                Ok(session) => {
                    ids.push(session.folder_name());
                    sessions.push(session);
                }
                Err(err) => {
                    tracing::warn!(folder = %folder, %err, "folder skipped during reimport");
                }
            }
            progress.file_done(folder);
        }
        progress.finish();

        self.sessions = sessions;
        self.index.sessions = ids;
        self.save_index()?;

        tracing::info!(count = self.sessions.len(), "archive reimported");
        Ok(self.sessions.len())
    }

    /// Tabular summary rows over the conventional metadata fields.
    ///
    /// The first column is the session identifier; values are truncated to
    /// 30 characters for display.
    pub fn listing(&self) -> Vec<Vec<String>> {
        self.sessions
            .iter()
            .map(|session| {
                let mut row = vec![truncate(&session.folder_name())];
                for field in &LIST_HEADERS[1..] {
                    row.push(truncate(&session.attributes().display(field)));
                }
                row
            })
            .collect()
    }

    /// Write the index, taking a one-per-run backup before the first write
    fn save_index(&mut self) -> Result<(), ArchiveError> {
        if !self.backed_up && self.index_path.exists() {
            let backup = self.index_path.with_extension(BACKUP_SUFFIX);
            fs::copy(&self.index_path, &backup)?;
            self.backed_up = true;
        }

        let content = serde_json::to_string_pretty(&self.index)?;
        fs::write(&self.index_path, content)?;
        Ok(())
    }
}

fn truncate(value: &str) -> String {
    value.chars().take(LIST_VALUE_WIDTH).collect()
}
