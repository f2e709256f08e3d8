//! Check command implementation.

use crate::prompt::ConsolePrompt;
use careerbank_core::{
    run_startup_check, CollectionStore, LayoutStatus, RecoveryOutcome, RestoreOutcome,
    SnapshotStatus,
};

/// Runs the startup integrity pass with the interactive recovery prompt.
pub fn run(store: &CollectionStore) -> Result<(), Box<dyn std::error::Error>> {
    println!("------------------------");
    println!("Performing startup check");
    println!("------------------------");

    let mut prompt = ConsolePrompt;
    let report = run_startup_check(store, &mut prompt)?;

    for dir in &report.integrity.created_directories {
        println!("Created folder: {}", dir.display());
    }

    for entry in &report.integrity.entries {
        match (&entry.status, &entry.resolution) {
            (LayoutStatus::Match, _) => println!("  ✓ {}", entry.name),
            (LayoutStatus::Created, _) => {
                println!("  ✓ {} (created with registered schema)", entry.name);
            }
            (LayoutStatus::Mismatch { .. }, Some(resolution)) => match resolution {
                RecoveryOutcome::Restored(RestoreOutcome::Restored { snapshot }) => {
                    println!("  ✓ {} (restored from {snapshot})", entry.name);
                }
                RecoveryOutcome::Restored(RestoreOutcome::RecreatedFresh) => {
                    println!("  ✓ {} (no backups, recreated fresh)", entry.name);
                }
                RecoveryOutcome::Recreated => {
                    println!("  ✓ {} (recreated, prior records discarded)", entry.name);
                }
                RecoveryOutcome::Ignored => {
                    println!("  ✗ {} (left mismatched)", entry.name);
                }
            },
            (LayoutStatus::Mismatch { .. }, None) => {
                println!("  ✗ {} (unresolved mismatch)", entry.name);
            }
        }
    }

    println!();
    match &report.snapshot {
        SnapshotStatus::Taken(outcome) => {
            println!("✓ Snapshot created: {}", outcome.path.display());
            for skip in &outcome.skipped {
                println!("  Warning: {} skipped ({})", skip.tree, skip.reason);
            }
        }
        SnapshotStatus::SkippedUnhealthy => {
            println!("✗ Backup skipped: store is not fully healthy");
        }
        SnapshotStatus::Failed(reason) => {
            println!("✗ Backup failed: {reason}");
        }
    }

    println!();
    if report.integrity.all_healthy() {
        println!("✓ Startup check complete");
        Ok(())
    } else {
        println!(
            "✗ Startup check finished with {} mismatched collection(s)",
            report.integrity.unhealthy_count()
        );
        Err("integrity check finished with unresolved mismatches".into())
    }
}
