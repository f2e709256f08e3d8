//! Storage root layout.
//!
//! This module handles the file system layout for a CareerBank store:
//!
//! ```text
//! <root>/
//! ├─ BACKUPS/<timestamp>/     # Snapshots (mirror of Outputs + Stored Info)
//! ├─ Outputs/
//! │  ├─ Cover Letters/
//! │  └─ Resumes/
//! └─ Stored Info/             # One file per collection
//! ```
//!
//! The root is an explicit configuration value passed into every
//! component constructor, never read from ambient process state, so tests
//! can point at an isolated temporary directory.

use crate::error::BankResult;
use crate::schema::CollectionSpec;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names within the storage root.
const BACKUPS_DIR: &str = "BACKUPS";
const OUTPUTS_DIR: &str = "Outputs";
const STORED_INFO_DIR: &str = "Stored Info";
const COVER_LETTERS_DIR: &str = "Cover Letters";
const RESUMES_DIR: &str = "Resumes";

/// The trees mirrored into every backup snapshot.
pub const SNAPSHOT_TREES: [&str; 2] = [OUTPUTS_DIR, STORED_INFO_DIR];

/// The top-level directory layout of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    base: PathBuf,
}

impl StorageRoot {
    /// Creates a storage root anchored at `base`.
    ///
    /// No filesystem access happens here; call
    /// [`ensure_directories`](Self::ensure_directories) to materialize
    /// the layout.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the backups directory.
    #[must_use]
    pub fn backups_dir(&self) -> PathBuf {
        self.base.join(BACKUPS_DIR)
    }

    /// Returns the outputs directory.
    #[must_use]
    pub fn outputs_dir(&self) -> PathBuf {
        self.base.join(OUTPUTS_DIR)
    }

    /// Returns the stored-info directory (all collection files).
    #[must_use]
    pub fn stored_info_dir(&self) -> PathBuf {
        self.base.join(STORED_INFO_DIR)
    }

    /// Returns the generated cover-letters directory.
    #[must_use]
    pub fn cover_letters_dir(&self) -> PathBuf {
        self.outputs_dir().join(COVER_LETTERS_DIR)
    }

    /// Returns the generated resumes directory.
    #[must_use]
    pub fn resumes_dir(&self) -> PathBuf {
        self.outputs_dir().join(RESUMES_DIR)
    }

    /// Returns the backing file path for a collection.
    #[must_use]
    pub fn collection_path(&self, spec: &CollectionSpec) -> PathBuf {
        self.stored_info_dir().join(spec.file_name)
    }

    /// Returns the path of a named snapshot directory.
    #[must_use]
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.backups_dir().join(name)
    }

    /// Returns the stored-info subtree inside a snapshot.
    #[must_use]
    pub fn snapshot_stored_info(&self, name: &str) -> PathBuf {
        self.snapshot_path(name).join(STORED_INFO_DIR)
    }

    /// Creates every expected directory (with parents) that is absent.
    ///
    /// Returns the paths that were created, for logging. Directories have
    /// no layout to verify; existence is the whole check.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn ensure_directories(&self) -> BankResult<Vec<PathBuf>> {
        let expected = [
            self.backups_dir(),
            self.outputs_dir(),
            self.cover_letters_dir(),
            self.resumes_dir(),
            self.stored_info_dir(),
        ];

        let mut created = Vec::new();
        for dir in expected {
            if !dir.exists() {
                fs::create_dir_all(&dir)?;
                created.push(dir);
            }
        }
        Ok(created)
    }
}
