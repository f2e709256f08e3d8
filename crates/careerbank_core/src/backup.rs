//! Snapshot backups and restore.
//!
//! A snapshot is a directory under `BACKUPS/` named by a sortable
//! timestamp (`YYYY-MM-DD_HH-MM-SS`) holding a recursive copy of the
//! `Outputs` and `Stored Info` trees. Names sort lexicographically in
//! creation order, so "most recent" is the lexicographic maximum.
//! Snapshots are never mutated after creation.

use crate::error::{BankError, BankResult};
use crate::layout::{StorageRoot, SNAPSHOT_TREES};
use crate::store::CollectionStore;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Why a tree was not copied into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The source tree does not exist yet (normal on a first run).
    SourceMissing,
    /// The copy failed partway; the message carries the I/O error.
    CopyFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMissing => write!(f, "source tree not found"),
            Self::CopyFailed(message) => write!(f, "copy failed: {message}"),
        }
    }
}

/// A tree that a snapshot run did not copy, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTree {
    /// Tree name relative to the storage root.
    pub tree: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of one snapshot run.
///
/// Snapshots are best-effort: per-tree failures land in `skipped` rather
/// than aborting, so callers can distinguish "source absent" from an I/O
/// failure without the run itself erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOutcome {
    /// Snapshot directory name (the timestamp).
    pub name: String,
    /// Full path of the snapshot directory.
    pub path: PathBuf,
    /// Trees copied in full.
    pub copied: Vec<String>,
    /// Trees skipped, with typed reasons.
    pub skipped: Vec<SkippedTree>,
}

/// Creates timestamped snapshots of the managed directories.
#[derive(Debug)]
pub struct BackupManager<'a> {
    root: &'a StorageRoot,
}

impl<'a> BackupManager<'a> {
    /// Creates a manager over the given root.
    #[must_use]
    pub fn new(root: &'a StorageRoot) -> Self {
        Self { root }
    }

    /// Formats a snapshot directory name from a timestamp.
    ///
    /// The format sorts lexicographically in chronological order.
    #[must_use]
    pub fn timestamp_name(now: &DateTime<Local>) -> String {
        now.format("%Y-%m-%d_%H-%M-%S").to_string()
    }

    /// Takes a snapshot named from the current local time.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::BackupNameCollision`] if a snapshot with the
    /// same second-resolution name already exists; the caller retries
    /// after a minimal delay rather than overwriting.
    pub fn snapshot(&self) -> BankResult<SnapshotOutcome> {
        self.snapshot_named(&Self::timestamp_name(&Local::now()))
    }

    /// Takes a snapshot with an explicit directory name.
    pub fn snapshot_named(&self, name: &str) -> BankResult<SnapshotOutcome> {
        let path = self.root.snapshot_path(name);
        if path.exists() {
            return Err(BankError::name_collision(name));
        }
        fs::create_dir_all(&path)?;
        info!(snapshot = name, "created snapshot directory");

        let mut copied = Vec::new();
        let mut skipped = Vec::new();

        for tree in SNAPSHOT_TREES {
            let source = self.root.base().join(tree);
            let destination = path.join(tree);

            if !source.exists() {
                warn!(tree, "source tree not found, skipping");
                skipped.push(SkippedTree {
                    tree: tree.to_string(),
                    reason: SkipReason::SourceMissing,
                });
                continue;
            }

            match copy_tree(&source, &destination) {
                Ok(()) => copied.push(tree.to_string()),
                Err(error) => {
                    warn!(tree, %error, "snapshot copy failed");
                    skipped.push(SkippedTree {
                        tree: tree.to_string(),
                        reason: SkipReason::CopyFailed(error.to_string()),
                    });
                }
            }
        }

        Ok(SnapshotOutcome {
            name: name.to_string(),
            path,
            copied,
            skipped,
        })
    }
}

/// Recursively copies `src` into `dst`, creating directories as needed.
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// How a restore request was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The file was byte-copied out of the named snapshot.
    Restored {
        /// Name of the snapshot the file came from.
        snapshot: String,
    },
    /// No snapshots existed; the file was recreated fresh from the
    /// schema registry.
    RecreatedFresh,
}

/// Restores a collection file from the most recent snapshot.
#[derive(Debug)]
pub struct BackupResolver<'a> {
    store: &'a CollectionStore,
}

impl<'a> BackupResolver<'a> {
    /// Creates a resolver over the given store.
    #[must_use]
    pub fn new(store: &'a CollectionStore) -> Self {
        Self { store }
    }

    /// Returns the name of the most recent snapshot, if any exist.
    ///
    /// "Most recent" is the lexicographically maximum directory name
    /// under the backups root.
    pub fn latest_snapshot(&self) -> BankResult<Option<String>> {
        let backups = self.store.root().backups_dir();
        if !backups.exists() {
            return Ok(None);
        }

        let mut latest: Option<String> = None;
        for entry in fs::read_dir(&backups)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if latest.as_deref().is_none_or(|current| name.as_str() > current) {
                latest = Some(name);
            }
        }
        Ok(latest)
    }

    /// Replaces a collection file with its most recent backed-up version.
    ///
    /// With no snapshots on disk, the file is recreated fresh from the
    /// schema registry instead.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::BackupEntryMissing`] if the most recent
    /// snapshot does not contain this collection (e.g. the collection was
    /// registered after the snapshot was taken).
    pub fn restore(&self, name: &str) -> BankResult<RestoreOutcome> {
        let spec = self.store.registry().spec_for(name)?;
        let live = self.store.root().collection_path(spec);

        let Some(snapshot) = self.latest_snapshot()? else {
            warn!(collection = name, "no backups found, creating from scratch");
            if live.exists() {
                fs::remove_file(&live)?;
            }
            self.store.create_empty(name)?;
            return Ok(RestoreOutcome::RecreatedFresh);
        };

        let backed_up = self
            .store
            .root()
            .snapshot_stored_info(&snapshot)
            .join(spec.file_name);
        if !backed_up.exists() {
            return Err(BankError::backup_entry_missing(name, snapshot));
        }

        if live.exists() {
            fs::remove_file(&live)?;
        }
        fs::copy(&backed_up, &live)?;
        info!(collection = name, snapshot = %snapshot, "restored file from snapshot");

        Ok(RestoreOutcome::Restored { snapshot })
    }
}
