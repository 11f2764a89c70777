//! # Domain Invariants
//!
//! Rules a participant list must satisfy to become a privacy group.

use super::errors::GroupError;
use super::value_objects::GroupConfig;
use shared_types::entities::Participant;
use std::collections::BTreeSet;

/// Invariant: group size within configured bounds.
pub fn invariant_member_bounds(count: usize, config: &GroupConfig) -> Result<(), GroupError> {
    if count < config.min_members {
        return Err(GroupError::invalid(format!(
            "too few members: {} < {}",
            count, config.min_members
        )));
    }
    if count > config.max_members {
        return Err(GroupError::invalid(format!(
            "too many members: {} > {}",
            count, config.max_members
        )));
    }
    Ok(())
}

/// Invariant: every identity appears once.
///
/// Returns the deduplicated set on success.
pub fn invariant_unique_members(
    participants: &[Participant],
) -> Result<BTreeSet<Participant>, GroupError> {
    let mut set = BTreeSet::new();
    for participant in participants {
        if participant.public_key().is_empty() {
            return Err(GroupError::invalid("empty public key"));
        }
        if !set.insert(participant.clone()) {
            return Err(GroupError::invalid("duplicate identity"));
        }
    }
    Ok(set)
}
