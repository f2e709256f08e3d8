//! The startup sequence: integrity pass, then snapshot.
//!
//! Runs before any other access to the store. A snapshot is taken only
//! when every collection ended the integrity pass healthy; snapshotting
//! a store known to be inconsistent would enshrine the corruption in the
//! backup generation.

use crate::backup::{BackupManager, SnapshotOutcome};
use crate::error::{BankError, BankResult};
use crate::integrity::{IntegrityChecker, IntegrityReport};
use crate::recovery::RecoveryHandler;
use crate::store::CollectionStore;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Delay before retrying a snapshot whose timestamp name collided.
const COLLISION_RETRY_DELAY: Duration = Duration::from_secs(1);

/// What happened to the backup step of a startup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// A snapshot was taken (possibly with per-tree skips).
    Taken(SnapshotOutcome),
    /// At least one collection ended the pass unhealthy; no snapshot.
    SkippedUnhealthy,
    /// The snapshot attempt failed. Best-effort: startup continues.
    Failed(String),
}

/// Result of one full startup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    /// The integrity pass results.
    pub integrity: IntegrityReport,
    /// The backup step result.
    pub snapshot: SnapshotStatus,
}

/// Runs the full startup check: integrity, recovery, then backup.
///
/// Mismatches are routed through `handler` as they are found. A failed
/// backup never prevents startup; a `BackupNameCollision` (sub-second
/// rerun) is retried once after a short delay with a fresh timestamp.
///
/// # Errors
///
/// Filesystem failures during the integrity pass propagate and abort
/// startup.
pub fn run_startup_check(
    store: &CollectionStore,
    handler: &mut dyn RecoveryHandler,
) -> BankResult<StartupReport> {
    info!("performing startup check");

    let integrity = IntegrityChecker::new(store).run(handler)?;

    let snapshot = if integrity.all_healthy() {
        info!("store healthy, generating backup");
        take_snapshot(store)
    } else {
        warn!(
            unhealthy = integrity.unhealthy_count(),
            "skipping backup: store is not fully healthy"
        );
        SnapshotStatus::SkippedUnhealthy
    };

    info!("startup check complete");
    Ok(StartupReport { integrity, snapshot })
}

fn take_snapshot(store: &CollectionStore) -> SnapshotStatus {
    let manager = BackupManager::new(store.root());
    match manager.snapshot() {
        Ok(outcome) => SnapshotStatus::Taken(outcome),
        Err(BankError::BackupNameCollision { name }) => {
            info!(name = %name, "snapshot name collision, retrying");
            thread::sleep(COLLISION_RETRY_DELAY);
            match manager.snapshot() {
                Ok(outcome) => SnapshotStatus::Taken(outcome),
                Err(error) => {
                    warn!(%error, "backup failed after retry");
                    SnapshotStatus::Failed(error.to_string())
                }
            }
        }
        Err(error) => {
            warn!(%error, "backup failed");
            SnapshotStatus::Failed(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StorageRoot;
    use crate::recovery::{RecoveryChoice, SchemaMismatch};
    use crate::schema::SchemaRegistry;
    use std::fs;
    use tempfile::tempdir;

    struct Scripted(Vec<RecoveryChoice>);

    impl RecoveryHandler for Scripted {
        fn choose(&mut self, _mismatch: &SchemaMismatch) -> RecoveryChoice {
            self.0.remove(0)
        }
    }

    fn store_at(temp: &tempfile::TempDir) -> CollectionStore {
        CollectionStore::new(StorageRoot::new(temp.path()), SchemaRegistry::new())
    }

    fn snapshot_count(store: &CollectionStore) -> usize {
        fs::read_dir(store.root().backups_dir())
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_type().unwrap().is_dir())
            .count()
    }

    #[test]
    fn healthy_pass_takes_exactly_one_snapshot() {
        let temp = tempdir().unwrap();
        let store = store_at(&temp);

        let report = run_startup_check(&store, &mut Scripted(Vec::new())).unwrap();

        assert!(report.integrity.all_healthy());
        let SnapshotStatus::Taken(outcome) = &report.snapshot else {
            panic!("expected a snapshot, got {:?}", report.snapshot);
        };
        assert_eq!(snapshot_count(&store), 1);

        // Snapshot holds copies identical to the live files.
        for spec in store.registry().iter() {
            let live = fs::read(store.path_for(spec.name).unwrap()).unwrap();
            let copy = fs::read(
                store
                    .root()
                    .snapshot_stored_info(&outcome.name)
                    .join(spec.file_name),
            )
            .unwrap();
            assert_eq!(live, copy, "collection {}", spec.name);
        }
    }

    #[test]
    fn ignored_mismatch_suppresses_backup() {
        let temp = tempdir().unwrap();
        let store = store_at(&temp);
        run_startup_check(&store, &mut Scripted(Vec::new())).unwrap();

        fs::write(store.path_for("skills").unwrap(), "skill_name\n").unwrap();

        let report =
            run_startup_check(&store, &mut Scripted(vec![RecoveryChoice::Ignore])).unwrap();

        assert_eq!(report.snapshot, SnapshotStatus::SkippedUnhealthy);
        // Only the first (healthy) run produced a snapshot.
        assert_eq!(snapshot_count(&store), 1);
    }

    #[test]
    fn recreated_mismatch_still_allows_backup() {
        let temp = tempdir().unwrap();
        let store = store_at(&temp);
        run_startup_check(&store, &mut Scripted(Vec::new())).unwrap();

        fs::write(store.path_for("skills").unwrap(), "skill_name\n").unwrap();

        let report =
            run_startup_check(&store, &mut Scripted(vec![RecoveryChoice::Recreate])).unwrap();

        assert!(report.integrity.all_healthy());
        assert!(matches!(report.snapshot, SnapshotStatus::Taken(_)));
    }

    #[test]
    fn restore_during_startup_pulls_most_recent_snapshot() {
        let temp = tempdir().unwrap();
        let store = store_at(&temp);

        // First healthy run: snapshot with a populated skills bank.
        run_startup_check(&store, &mut Scripted(Vec::new())).unwrap();
        store
            .append("skills", &["Rust".to_string(), "7".to_string()])
            .unwrap();
        let report = run_startup_check(&store, &mut Scripted(Vec::new())).unwrap();
        assert!(matches!(report.snapshot, SnapshotStatus::Taken(_)));

        // Corrupt the header, then restore from backup during startup.
        fs::write(store.path_for("skills").unwrap(), "wrecked\n").unwrap();
        let report =
            run_startup_check(&store, &mut Scripted(vec![RecoveryChoice::Restore])).unwrap();

        assert!(report.integrity.all_healthy());
        assert_eq!(
            store.read_all("skills").unwrap(),
            vec![vec!["Rust".to_string(), "7".to_string()]]
        );
    }
}
