//! # Inbound Ports
//!
//! API trait defining what the Group Membership subsystem can do.

use crate::domain::{GroupError, PrivacyGroup};
use shared_types::entities::{GroupId, Participant};

/// Group membership API - inbound port.
///
/// Queries on an unknown group answer `false`/`None`; they never reveal
/// more than a membership check against a real group would.
pub trait GroupMembershipApi: Send + Sync {
    /// Create (or look up) the group for `participants`.
    ///
    /// Fails with `InvalidGroup` for fewer than two participants or a
    /// repeated identity. Creating the same set twice returns the same id.
    fn create(&self, participants: &[Participant]) -> Result<GroupId, GroupError>;

    /// Whether `participant` is a member of `group`.
    fn is_member(&self, group: &GroupId, participant: &Participant) -> bool;

    /// Whether every candidate is a member of `group`.
    fn contains(&self, group: &GroupId, candidates: &[Participant]) -> bool;

    /// Snapshot of a group.
    fn group(&self, group: &GroupId) -> Option<PrivacyGroup>;
}
