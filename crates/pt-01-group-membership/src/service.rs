//! # Group Registry
//!
//! Application service implementing `GroupMembershipApi`.

use crate::domain::{
    group_fingerprint, invariant_member_bounds, invariant_unique_members, GroupConfig,
    GroupError, PrivacyGroup,
};
use crate::ports::GroupMembershipApi;
use parking_lot::RwLock;
use shared_types::entities::{GroupId, Participant};
use std::collections::HashMap;
use tracing::{debug, info};

/// In-memory registry of privacy groups.
///
/// Groups are insert-only; the only write is the first `create` of a set.
pub struct GroupRegistry {
    config: GroupConfig,
    groups: RwLock<HashMap<GroupId, PrivacyGroup>>,
}

impl GroupRegistry {
    /// Create an empty registry.
    pub fn new(config: GroupConfig) -> Self {
        Self {
            config,
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Whether no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new(GroupConfig::default())
    }
}

impl GroupMembershipApi for GroupRegistry {
    fn create(&self, participants: &[Participant]) -> Result<GroupId, GroupError> {
        invariant_member_bounds(participants.len(), &self.config)?;
        let members = invariant_unique_members(participants)?;
        let id = group_fingerprint(&members);

        let mut groups = self.groups.write();
        if groups.contains_key(&id) {
            debug!("[pt-01] Reusing privacy group {}", id);
            return Ok(id);
        }

        info!("[pt-01] Created privacy group {} ({} members)", id, members.len());
        groups.insert(id, PrivacyGroup::new(id, members));
        Ok(id)
    }

    fn is_member(&self, group: &GroupId, participant: &Participant) -> bool {
        self.groups
            .read()
            .get(group)
            .is_some_and(|g| g.contains(participant))
    }

    fn contains(&self, group: &GroupId, candidates: &[Participant]) -> bool {
        let groups = self.groups.read();
        let Some(g) = groups.get(group) else {
            return false;
        };
        candidates.iter().all(|c| g.contains(c))
    }

    fn group(&self, group: &GroupId) -> Option<PrivacyGroup> {
        self.groups.read().get(group).cloned()
    }
}
