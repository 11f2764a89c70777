//! # Domain Errors

use thiserror::Error;

/// Private state store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Absent partition, empty partition, or caller outside the group.
    #[error("not found")]
    NotFound,

    /// The partition was already opened.
    #[error("partition already exists")]
    AlreadyExists,

    /// The backend holds a newer version than the writer read.
    #[error("version conflict: expected {expected}, found {found}")]
    VersionConflict {
        /// Version the writer started from.
        expected: u64,
        /// Version currently stored.
        found: u64,
    },

    /// Record could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// Backend lock poisoned.
    #[error("lock poisoned")]
    LockPoisoned,
}
