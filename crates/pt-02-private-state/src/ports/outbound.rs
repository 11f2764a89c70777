//! # Outbound Ports
//!
//! Storage the private state store depends on.

use crate::domain::{Partition, StoreError};
use shared_types::entities::PartitionKey;

/// Sealed partition storage.
pub trait PartitionBackend: Send + Sync {
    /// Create an empty partition. Fails with `AlreadyExists` if present.
    fn create(&self, key: &PartitionKey) -> Result<(), StoreError>;

    /// Load a partition.
    fn load(&self, key: &PartitionKey) -> Result<Option<Partition>, StoreError>;

    /// Replace the sealed bytes if the stored version equals `expected`.
    ///
    /// Returns the new version.
    fn compare_and_swap(
        &self,
        key: &PartitionKey,
        expected: u64,
        sealed: Vec<u8>,
    ) -> Result<u64, StoreError>;
}
