//! # `CallEnvelope` Request Descriptor
//!
//! The universal wrapper for every call entering the engine.
//!
//! ## Properties
//!
//! - **Versioning**: All calls include a `version` field for forward compatibility.
//! - **Correlation**: `correlation_id` ties a call to its receipt and log lines.
//! - **Explicit Scope**: `group` is `Some(GroupId)` for calls into a private
//!   partition and `None` for the public partition. There is no other flag.
//! - **Caller Authority**: `caller` is supplied by the identity provider and
//!   trusted as already authenticated.

use crate::entities::{GroupId, Participant};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed call with its caller and privacy scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEnvelope<T> {
    /// Protocol version for forward compatibility.
    pub version: u16,

    /// Unique identifier correlating the call, its receipt and its logs.
    pub correlation_id: Uuid,

    /// Authenticated caller identity.
    pub caller: Participant,

    /// Privacy scope. `None` means the public partition.
    pub group: Option<GroupId>,

    /// Unix timestamp (seconds) when the call was created.
    pub timestamp: u64,

    /// The call itself.
    pub payload: T,
}

impl<T> CallEnvelope<T> {
    /// Current protocol version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Create a call against the public partition.
    pub fn public(caller: Participant, payload: T) -> Self {
        Self::new(caller, None, payload)
    }

    /// Create a call scoped to a privacy group.
    pub fn private(caller: Participant, group: GroupId, payload: T) -> Self {
        Self::new(caller, Some(group), payload)
    }

    fn new(caller: Participant, group: Option<GroupId>, payload: T) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            correlation_id: Uuid::new_v4(),
            caller,
            group,
            timestamp: unix_now(),
            payload,
        }
    }

    /// Whether this call claims a privacy-group scope.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.group.is_some()
    }
}

/// Seconds since the Unix epoch (0 if the clock is before the epoch).
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
