//! Interactive recovery of mismatched collection files.
//!
//! When the integrity pass finds a file whose layout no longer matches
//! the registry, the operator picks one of three terminal actions:
//! restore from the most recent backup, recreate the file empty, or
//! proceed without change. Choice *parsing* is a pure function here; the
//! indefinite re-prompt loop lives only in the interactive shell.

use crate::backup::{BackupResolver, RestoreOutcome};
use crate::error::BankResult;
use crate::store::CollectionStore;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// A collection whose on-disk layout diverged from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMismatch {
    /// Logical collection name.
    pub collection: String,
    /// Path of the offending file.
    pub path: PathBuf,
    /// Layout the registry declares.
    pub expected: Vec<String>,
    /// Layout the file actually has.
    pub found: Vec<String>,
}

/// The operator's selection for one mismatched collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// Replace the file from the most recent backup.
    Restore,
    /// Delete the file and recreate it with only the schema.
    Recreate,
    /// Leave the file as-is for this run.
    Ignore,
}

/// Rejected recovery-menu input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid choice {input:?}")]
pub struct InvalidChoice {
    /// The raw input that was rejected.
    pub input: String,
}

impl RecoveryChoice {
    /// Parses menu input (`"1"`, `"2"`, or `"3"`, surrounding whitespace
    /// ignored) into a typed choice.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidChoice`] for anything else; the caller decides
    /// whether to re-prompt.
    pub fn parse(input: &str) -> Result<Self, InvalidChoice> {
        match input.trim() {
            "1" => Ok(Self::Restore),
            "2" => Ok(Self::Recreate),
            "3" => Ok(Self::Ignore),
            other => Err(InvalidChoice {
                input: other.to_string(),
            }),
        }
    }
}

/// Supplies the recovery choice for a mismatch.
///
/// The CLI implements this with an interactive prompt; tests script it.
pub trait RecoveryHandler {
    /// Picks an action for the given mismatch.
    fn choose(&mut self, mismatch: &SchemaMismatch) -> RecoveryChoice;
}

/// Terminal state of one recovery invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// The file was replaced through the backup resolver. Not re-verified
    /// against the schema in the same run.
    Restored(RestoreOutcome),
    /// The file was deleted and rewritten schema-only. Prior records in
    /// the collection are gone (a snapshot from an earlier healthy run
    /// may still hold them).
    Recreated,
    /// Nothing was done; the collection stays mismatched for this run.
    Ignored,
}

impl RecoveryOutcome {
    /// Whether the collection can be treated as healthy after recovery.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Carries out the chosen recovery action for a mismatched collection.
#[derive(Debug)]
pub struct RecoveryCoordinator<'a> {
    store: &'a CollectionStore,
}

impl<'a> RecoveryCoordinator<'a> {
    /// Creates a coordinator over the given store.
    #[must_use]
    pub fn new(store: &'a CollectionStore) -> Self {
        Self { store }
    }

    /// Asks the handler for a choice and applies it.
    ///
    /// # Errors
    ///
    /// Filesystem failures (delete, rewrite, copy) propagate; they are
    /// fatal to the startup sequence. A restore against an incomplete
    /// snapshot surfaces [`crate::BankError::BackupEntryMissing`].
    pub fn resolve(
        &self,
        mismatch: &SchemaMismatch,
        handler: &mut dyn RecoveryHandler,
    ) -> BankResult<RecoveryOutcome> {
        match handler.choose(mismatch) {
            RecoveryChoice::Restore => {
                let resolver = BackupResolver::new(self.store);
                let outcome = resolver.restore(&mismatch.collection)?;
                Ok(RecoveryOutcome::Restored(outcome))
            }
            RecoveryChoice::Recreate => {
                if mismatch.path.exists() {
                    fs::remove_file(&mismatch.path)?;
                }
                self.store.create_empty(&mismatch.collection)?;
                info!(collection = %mismatch.collection, "recreated file with registered schema");
                Ok(RecoveryOutcome::Recreated)
            }
            RecoveryChoice::Ignore => {
                warn!(
                    collection = %mismatch.collection,
                    "proceeding with mismatched layout"
                );
                Ok(RecoveryOutcome::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StorageRoot;
    use crate::schema::SchemaRegistry;
    use tempfile::tempdir;

    struct Scripted(RecoveryChoice);

    impl RecoveryHandler for Scripted {
        fn choose(&mut self, _mismatch: &SchemaMismatch) -> RecoveryChoice {
            self.0
        }
    }

    fn store_at(temp: &tempfile::TempDir) -> CollectionStore {
        let root = StorageRoot::new(temp.path());
        root.ensure_directories().unwrap();
        CollectionStore::new(root, SchemaRegistry::new())
    }

    fn skills_mismatch(store: &CollectionStore) -> SchemaMismatch {
        SchemaMismatch {
            collection: "skills".to_string(),
            path: store.path_for("skills").unwrap(),
            expected: vec!["skill_name".to_string(), "level".to_string()],
            found: vec!["skill_name".to_string()],
        }
    }

    #[test]
    fn parse_accepts_only_menu_digits() {
        assert_eq!(RecoveryChoice::parse("1"), Ok(RecoveryChoice::Restore));
        assert_eq!(RecoveryChoice::parse(" 2 "), Ok(RecoveryChoice::Recreate));
        assert_eq!(RecoveryChoice::parse("3\n"), Ok(RecoveryChoice::Ignore));

        for bad in ["", "4", "restore", "12", "one"] {
            assert!(RecoveryChoice::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn recreate_discards_records_and_restores_schema() {
        let temp = tempdir().unwrap();
        let store = store_at(&temp);

        // A file with a dropped column and stale data.
        std::fs::write(
            store.path_for("skills").unwrap(),
            "skill_name\nRust\nSQL\n",
        )
        .unwrap();

        let coordinator = RecoveryCoordinator::new(&store);
        let outcome = coordinator
            .resolve(&skills_mismatch(&store), &mut Scripted(RecoveryChoice::Recreate))
            .unwrap();

        assert_eq!(outcome, RecoveryOutcome::Recreated);
        assert!(outcome.is_healthy());
        assert_eq!(store.read_layout("skills").unwrap(), ["skill_name", "level"]);
        assert!(store.read_all("skills").unwrap().is_empty());
    }

    #[test]
    fn ignore_leaves_file_untouched() {
        let temp = tempdir().unwrap();
        let store = store_at(&temp);

        let path = store.path_for("skills").unwrap();
        std::fs::write(&path, "skill_name\nRust\n").unwrap();

        let coordinator = RecoveryCoordinator::new(&store);
        let outcome = coordinator
            .resolve(&skills_mismatch(&store), &mut Scripted(RecoveryChoice::Ignore))
            .unwrap();

        assert_eq!(outcome, RecoveryOutcome::Ignored);
        assert!(!outcome.is_healthy());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "skill_name\nRust\n"
        );
    }

    #[test]
    fn restore_without_backups_falls_back_to_fresh_file() {
        let temp = tempdir().unwrap();
        let store = store_at(&temp);

        std::fs::write(store.path_for("skills").unwrap(), "skill_name\nRust\n").unwrap();

        let coordinator = RecoveryCoordinator::new(&store);
        let outcome = coordinator
            .resolve(&skills_mismatch(&store), &mut Scripted(RecoveryChoice::Restore))
            .unwrap();

        assert_eq!(
            outcome,
            RecoveryOutcome::Restored(RestoreOutcome::RecreatedFresh)
        );
        assert_eq!(store.read_layout("skills").unwrap(), ["skill_name", "level"]);
    }
}
