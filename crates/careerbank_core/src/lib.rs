//! # CareerBank Core
//!
//! Schema-validated flat-file record store for CareerBank.
//!
//! This crate provides:
//! - A schema registry declaring the shape of every persisted collection
//! - A collection store (CSV banks + a JSON profile) with wholesale
//!   read/rewrite operations
//! - A startup integrity pass that creates missing files and verifies
//!   on-disk layouts against the registry
//! - Interactive recovery of mismatched files (restore / recreate /
//!   ignore)
//! - Timestamped snapshot backups of the managed directories
//!
//! ## Startup flow
//!
//! ```rust,ignore
//! use careerbank_core::{run_startup_check, CollectionStore, SchemaRegistry, StorageRoot};
//!
//! let store = CollectionStore::new(StorageRoot::new("bank"), SchemaRegistry::new());
//! let report = run_startup_check(&store, &mut my_recovery_handler)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod error;
mod integrity;
mod layout;
mod recovery;
mod schema;
mod startup;
mod store;

pub use backup::{
    BackupManager, BackupResolver, RestoreOutcome, SkipReason, SkippedTree, SnapshotOutcome,
};
pub use error::{BankError, BankResult};
pub use integrity::{CollectionHealth, IntegrityChecker, IntegrityReport, LayoutStatus};
pub use layout::{StorageRoot, SNAPSHOT_TREES};
pub use recovery::{
    InvalidChoice, RecoveryChoice, RecoveryCoordinator, RecoveryHandler, RecoveryOutcome,
    SchemaMismatch,
};
pub use schema::{CollectionKind, CollectionSpec, SchemaRegistry};
pub use startup::{run_startup_check, SnapshotStatus, StartupReport};
pub use store::CollectionStore;

/// Crate version, surfaced by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
