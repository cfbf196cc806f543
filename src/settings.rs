//! User settings persistence.
//!
//! Settings load from a JSON file under the platform config directory and
//! fall back to defaults on absence or parse failure. The core never reads
//! these directly; callers build an explicit [`ImportOptions`] from them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::session::ImportOptions;

/// Default name of the per-session metadata file
pub const DEFAULT_GENERAL_FILENAME: &str = "general.log";

/// Settings that persist across runs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Archive/data directory; platform data dir when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Directory the local log source fetches from
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    /// Name of the general metadata file within a session folder
    #[serde(default = "default_general_filename")]
    pub general_filename: String,
    /// Abort imports on parse degradations instead of dropping values
    #[serde(default)]
    pub strict: bool,
}

fn default_version() -> u32 {
    1
}

fn default_general_filename() -> String {
    DEFAULT_GENERAL_FILENAME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            data_dir: None,
            source_dir: None,
            general_filename: default_general_filename(),
            strict: false,
        }
    }
}

impl Settings {
    /// Config directory for riglog
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("riglog"))
    }

    /// Path of the settings JSON file
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Archive/data directory, from settings or the platform default
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("riglog")))
    }

    /// Import configuration derived from these settings
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            strict: self.strict,
        }
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = match Self::settings_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(%err, "settings file unreadable, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }
}
