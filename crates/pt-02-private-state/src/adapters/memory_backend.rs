use crate::domain::{Partition, StoreError};
use crate::ports::PartitionBackend;
use shared_types::entities::PartitionKey;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory implementation of `PartitionBackend`.
pub struct InMemoryPartitionBackend {
    partitions: RwLock<HashMap<PartitionKey, Partition>>,
}

impl InMemoryPartitionBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            partitions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPartitionBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionBackend for InMemoryPartitionBackend {
    fn create(&self, key: &PartitionKey) -> Result<(), StoreError> {
        let mut partitions = self
            .partitions
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if partitions.contains_key(key) {
            return Err(StoreError::AlreadyExists);
        }
        partitions.insert(*key, Partition::default());
        Ok(())
    }

    fn load(&self, key: &PartitionKey) -> Result<Option<Partition>, StoreError> {
        let partitions = self
            .partitions
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(partitions.get(key).cloned())
    }

    fn compare_and_swap(
        &self,
        key: &PartitionKey,
        expected: u64,
        sealed: Vec<u8>,
    ) -> Result<u64, StoreError> {
        let mut partitions = self
            .partitions
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let partition = partitions.get_mut(key).ok_or(StoreError::NotFound)?;
        if partition.version != expected {
            return Err(StoreError::VersionConflict {
                expected,
                found: partition.version,
            });
        }
        partition.version += 1;
        partition.sealed = Some(sealed);
        Ok(partition.version)
    }
}
