//! Error types for the CareerBank record store.

use std::io;
use thiserror::Error;

/// Result type for record-store operations.
pub type BankResult<T> = Result<T, BankError>;

/// Errors that can occur in record-store operations.
///
/// Schema mismatches and missing backups are deliberately *not* errors:
/// they are reported through [`crate::IntegrityReport`] entries and
/// [`crate::RestoreOutcome`] values so callers can drive recovery instead
/// of unwinding.
#[derive(Debug, Error)]
pub enum BankError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The collection name is not in the schema registry.
    #[error("unknown collection: {name}")]
    UnknownCollection {
        /// The name that was looked up.
        name: String,
    },

    /// The most recent snapshot does not contain the requested collection.
    #[error("backup entry missing: snapshot {snapshot} has no file for collection {collection}")]
    BackupEntryMissing {
        /// The collection being restored.
        collection: String,
        /// The snapshot directory that was searched.
        snapshot: String,
    },

    /// A snapshot directory with the computed name already exists.
    #[error("backup name collision: {name} already exists")]
    BackupNameCollision {
        /// The colliding snapshot directory name.
        name: String,
    },

    /// A record's field count does not match the collection schema.
    #[error("field count mismatch in {collection}: expected {expected} fields, got {actual}")]
    FieldCountMismatch {
        /// The collection being written.
        collection: String,
        /// Number of fields the schema declares.
        expected: usize,
        /// Number of fields in the offending record.
        actual: usize,
    },

    /// Operation not permitted for this collection kind.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl BankError {
    /// Creates an unknown-collection error.
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        Self::UnknownCollection { name: name.into() }
    }

    /// Creates a backup-entry-missing error.
    pub fn backup_entry_missing(
        collection: impl Into<String>,
        snapshot: impl Into<String>,
    ) -> Self {
        Self::BackupEntryMissing {
            collection: collection.into(),
            snapshot: snapshot.into(),
        }
    }

    /// Creates a backup-name-collision error.
    pub fn name_collision(name: impl Into<String>) -> Self {
        Self::BackupNameCollision { name: name.into() }
    }

    /// Creates a field-count-mismatch error.
    pub fn field_count_mismatch(
        collection: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::FieldCountMismatch {
            collection: collection.into(),
            expected,
            actual,
        }
    }

    /// Creates an invalid-operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
