//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, GroupId, Participant};
use std::collections::BTreeSet;

/// An immutable privacy group.
///
/// Only constructed by the registry after the membership invariants hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyGroup {
    id: GroupId,
    members: BTreeSet<Participant>,
}

impl PrivacyGroup {
    pub(crate) fn new(id: GroupId, members: BTreeSet<Participant>) -> Self {
        Self { id, members }
    }

    /// Group fingerprint.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Members in key order.
    pub fn members(&self) -> impl Iterator<Item = &Participant> {
        self.members.iter()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a constructed group.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `participant` belongs to the group.
    pub fn contains(&self, participant: &Participant) -> bool {
        self.members.contains(participant)
    }

    /// Whether any member's account address equals `address`.
    pub fn contains_address(&self, address: &Address) -> bool {
        self.members.iter().any(|m| m.address() == *address)
    }
}
