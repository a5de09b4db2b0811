//! Session configuration.
//!
//! # Responsibility
//! - Gather the file location, open mode and logging settings in one value.
//!
//! # Invariants
//! - `DirectoryConfig::default()` reproduces the reference session: a fresh
//!   `telephone_directory.txt` in the working directory.

use crate::logging::default_log_level;
use crate::store::OpenMode;
use std::path::PathBuf;

/// File name used when no other path is configured.
pub const DEFAULT_DIRECTORY_FILE: &str = "telephone_directory.txt";

const LOG_DIR_NAME: &str = "teldir-logs";

/// Settings for one directory session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Directory record file.
    pub path: PathBuf,
    pub open_mode: OpenMode,
    /// One of trace|debug|info|warn|error.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    ///
    /// Defaults under `std::env::temp_dir()`, which honors `TMPDIR`. This is
    /// the one environment lookup the binary makes, and it only moves logs.
    pub log_dir: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DIRECTORY_FILE),
            open_mode: OpenMode::Truncate,
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(LOG_DIR_NAME),
        }
    }
}

impl DirectoryConfig {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_open_mode(mut self, open_mode: OpenMode) -> Self {
        self.open_mode = open_mode;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
