//! # Domain Errors

use thiserror::Error;

/// Group membership errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// The participant set cannot form a privacy group.
    #[error("Invalid group: {reason}")]
    InvalidGroup {
        /// Why the set was rejected (no participant data).
        reason: String,
    },
}

impl GroupError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidGroup {
            reason: reason.into(),
        }
    }
}
