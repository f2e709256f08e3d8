//! Startup integrity checking.
//!
//! Walks the schema registry once per process start: missing directories
//! and files are created (created files are healthy by construction);
//! existing files have their declared layout compared against the
//! registry with strict ordered equality. Each mismatch is resolved
//! through the recovery coordinator before the checker moves on to the
//! next collection.

use crate::error::BankResult;
use crate::recovery::{RecoveryCoordinator, RecoveryHandler, RecoveryOutcome, SchemaMismatch};
use crate::store::CollectionStore;
use std::path::PathBuf;
use tracing::{info, warn};

/// How a collection's on-disk layout compared against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutStatus {
    /// The declared layout equals the registered schema.
    Match,
    /// The file was absent and has been created fresh from the schema.
    Created,
    /// The declared layout diverged from the registered schema.
    Mismatch {
        /// Layout the registry declares.
        expected: Vec<String>,
        /// Layout the file actually has.
        found: Vec<String>,
    },
}

/// Integrity result for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHealth {
    /// Logical collection name.
    pub name: String,
    /// Layout comparison result.
    pub status: LayoutStatus,
    /// How a mismatch was resolved, if there was one.
    pub resolution: Option<RecoveryOutcome>,
}

impl CollectionHealth {
    /// Whether this collection ended the pass in a trustworthy state.
    ///
    /// A mismatch left in the `Ignored` state is unhealthy; restored and
    /// recreated files are trusted without re-verification.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        match &self.status {
            LayoutStatus::Match | LayoutStatus::Created => true,
            LayoutStatus::Mismatch { .. } => self
                .resolution
                .as_ref()
                .map(RecoveryOutcome::is_healthy)
                .unwrap_or(false),
        }
    }
}

/// Result of one integrity pass. Computed per run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Directories that had to be created this run.
    pub created_directories: Vec<PathBuf>,
    /// Per-collection results, in registry order.
    pub entries: Vec<CollectionHealth>,
}

impl IntegrityReport {
    /// True when every collection ended the pass healthy.
    ///
    /// Drives whether a backup snapshot is taken this run.
    #[must_use]
    pub fn all_healthy(&self) -> bool {
        self.entries.iter().all(CollectionHealth::is_healthy)
    }

    /// Number of collections left unhealthy.
    #[must_use]
    pub fn unhealthy_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_healthy()).count()
    }
}

/// Verifies every registered collection on process start.
#[derive(Debug)]
pub struct IntegrityChecker<'a> {
    store: &'a CollectionStore,
}

impl<'a> IntegrityChecker<'a> {
    /// Creates a checker over the given store.
    #[must_use]
    pub fn new(store: &'a CollectionStore) -> Self {
        Self { store }
    }

    /// Runs the integrity pass.
    ///
    /// Mismatches are handled synchronously and sequentially: the
    /// handler is consulted for each one before checking proceeds to the
    /// next collection. The checker never resolves a mismatch on its
    /// own.
    ///
    /// # Errors
    ///
    /// Filesystem and codec failures propagate and abort the pass;
    /// operating on a store of unknown integrity is worse than refusing
    /// to start.
    pub fn run(&self, handler: &mut dyn RecoveryHandler) -> BankResult<IntegrityReport> {
        let created_directories = self.store.root().ensure_directories()?;
        for dir in &created_directories {
            info!(path = %dir.display(), "created directory");
        }

        let coordinator = RecoveryCoordinator::new(self.store);
        let mut entries = Vec::new();

        for spec in self.store.registry().iter() {
            let path = self.store.root().collection_path(spec);

            if !path.exists() {
                self.store.create_empty(spec.name)?;
                info!(collection = spec.name, "created file with registered schema");
                entries.push(CollectionHealth {
                    name: spec.name.to_string(),
                    status: LayoutStatus::Created,
                    resolution: None,
                });
                continue;
            }

            let found = self.store.read_layout(spec.name)?;
            if spec.matches_layout(&found) {
                entries.push(CollectionHealth {
                    name: spec.name.to_string(),
                    status: LayoutStatus::Match,
                    resolution: None,
                });
                continue;
            }

            warn!(
                collection = spec.name,
                expected = ?spec.fields,
                found = ?found,
                "layout mismatch, file may be corrupted"
            );
            let mismatch = SchemaMismatch {
                collection: spec.name.to_string(),
                path,
                expected: spec.field_list(),
                found: found.clone(),
            };
            let resolution = coordinator.resolve(&mismatch, handler)?;
            entries.push(CollectionHealth {
                name: spec.name.to_string(),
                status: LayoutStatus::Mismatch {
                    expected: mismatch.expected,
                    found,
                },
                resolution: Some(resolution),
            });
        }

        Ok(IntegrityReport {
            created_directories,
            entries,
        })
    }
}
