//! # Domain Value Objects

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::entities::{GroupId, Participant};

/// Domain tag mixed into every fingerprint.
const FINGERPRINT_DOMAIN: &[u8] = b"pt-privacy-group-v1";

/// Group membership configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Smallest allowed group.
    pub min_members: usize,
    /// Largest allowed group.
    pub max_members: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            min_members: 2,
            max_members: 64,
        }
    }
}

/// Deterministic fingerprint of a membership set.
///
/// Keys are hashed in sorted order, each prefixed with its length, so the
/// result does not depend on the order participants were supplied in and
/// two different sets cannot collide by concatenation.
pub fn group_fingerprint<'a, I>(members: I) -> GroupId
where
    I: IntoIterator<Item = &'a Participant>,
{
    let mut keys: Vec<&[u8]> = members.into_iter().map(Participant::public_key).collect();
    keys.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(FINGERPRINT_DOMAIN);
    hasher.update((keys.len() as u64).to_be_bytes());
    for key in keys {
        hasher.update((key.len() as u64).to_be_bytes());
        hasher.update(key);
    }
    GroupId(hasher.finalize().into())
}
