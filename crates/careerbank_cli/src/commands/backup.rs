//! Backup and restore commands.
//!
//! Snapshots only a healthy store: a non-interactive integrity pass runs
//! first, and any mismatch refuses the snapshot instead of enshrining a
//! corrupted file in the backup generation.

use careerbank_core::{
    BackupManager, BackupResolver, CollectionStore, IntegrityChecker, RecoveryChoice,
    RecoveryHandler, RestoreOutcome, SchemaMismatch,
};
use tracing::info;

/// Non-interactive handler: leaves every mismatch unresolved so the
/// caller can refuse to proceed.
struct IgnoreAll;

impl RecoveryHandler for IgnoreAll {
    fn choose(&mut self, _mismatch: &SchemaMismatch) -> RecoveryChoice {
        RecoveryChoice::Ignore
    }
}

/// Creates a snapshot of the store.
pub fn create(store: &CollectionStore) -> Result<(), Box<dyn std::error::Error>> {
    info!("verifying store before snapshot");

    let report = IntegrityChecker::new(store).run(&mut IgnoreAll)?;
    if !report.all_healthy() {
        return Err(format!(
            "store has {} mismatched collection(s); run `careerbank check` first",
            report.unhealthy_count()
        )
        .into());
    }

    let manager = BackupManager::new(store.root());
    let outcome = manager.snapshot()?;

    println!("✓ Snapshot created");
    println!("  Path: {}", outcome.path.display());
    for tree in &outcome.copied {
        println!("  Copied: {tree}");
    }
    for skip in &outcome.skipped {
        println!("  Skipped {}: {}", skip.tree, skip.reason);
    }

    Ok(())
}

/// Restores one collection from the most recent snapshot.
pub fn restore(
    store: &CollectionStore,
    collection: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = BackupResolver::new(store);

    match resolver.restore(collection)? {
        RestoreOutcome::Restored { snapshot } => {
            println!("✓ Restored {collection} from snapshot {snapshot}");
        }
        RestoreOutcome::RecreatedFresh => {
            println!("No backups found; recreated {collection} with its registered schema");
        }
    }

    Ok(())
}
