//! Data-directory layout and path resolution.
//!
//! # Responsibility
//! - Resolve the workboy home directory from the environment.
//! - Name the datafile, backup, archive and log locations.
//!
//! # Invariants
//! - Archive filenames embed their date in ISO form.
//! - Log files live in a subdirectory, out of archive listings.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

pub const DATA_FILE_NAME: &str = "workboy_data";
pub const BACKUP_FILE_NAME: &str = "workboy_backup";
pub const ARCHIVE_FILE_PREFIX: &str = "workboy_archive";

/// Overrides the home directory when set, mainly for tests.
pub const HOME_ENV_VAR: &str = "WORKBOY_HOME";

/// Root of the workboy data directory and the well-known files inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Resolves the home directory: `$WORKBOY_HOME` if set, else `~/.workboy`.
    pub fn resolve() -> Option<Self> {
        if let Ok(override_path) = std::env::var(HOME_ENV_VAR) {
            return Some(Self {
                root: PathBuf::from(override_path),
            });
        }
        dirs::home_dir().map(|home| Self {
            root: home.join(".workboy"),
        })
    }

    /// Uses `root` directly, bypassing the environment lookup.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    pub fn datafile(&self) -> PathBuf {
        self.root.join(DATA_FILE_NAME)
    }

    pub fn backup(&self) -> PathBuf {
        self.root.join(BACKUP_FILE_NAME)
    }

    pub fn archive_for(&self, day: NaiveDate) -> PathBuf {
        self.root.join(format!("{ARCHIVE_FILE_PREFIX}{day}"))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
