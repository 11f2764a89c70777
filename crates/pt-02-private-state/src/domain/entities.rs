//! # Domain Entities

use serde::{Deserialize, Serialize};

/// A stored partition as the backend sees it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Incremented on every committed write. `0` for a freshly opened slot.
    pub version: u64,
    /// Encoded record, `None` until the first write.
    pub sealed: Option<Vec<u8>>,
}

/// A decoded record together with the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<R> {
    /// Partition version.
    pub version: u64,
    /// Decoded record.
    pub record: R,
}
