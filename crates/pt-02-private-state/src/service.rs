//! # Private State Store Service
//!
//! Membership-gated, per-key serialized access to sealed partitions.

use crate::domain::{StoreError, Versioned};
use crate::ports::PartitionBackend;
use parking_lot::Mutex;
use pt_01_group_membership::GroupMembershipApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::entities::{Participant, PartitionKey};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

/// Private state store for records of type `R`.
pub struct PrivateStateStore<R> {
    groups: Arc<dyn GroupMembershipApi>,
    backend: Arc<dyn PartitionBackend>,
    /// One writer lock per partition.
    locks: Mutex<HashMap<PartitionKey, Arc<Mutex<()>>>>,
    _record: PhantomData<fn() -> R>,
}

impl<R> PrivateStateStore<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Create a store over `backend`, authorizing against `groups`.
    pub fn new(groups: Arc<dyn GroupMembershipApi>, backend: Arc<dyn PartitionBackend>) -> Self {
        Self {
            groups,
            backend,
            locks: Mutex::new(HashMap::new()),
            _record: PhantomData,
        }
    }

    /// Open an empty partition. The caller must be a member of `key.group`.
    pub fn open(&self, key: &PartitionKey, caller: &Participant) -> Result<(), StoreError> {
        self.authorize(key, caller)?;
        self.backend.create(key)?;
        debug!("[pt-02] Opened partition {}", key);
        Ok(())
    }

    /// Read the record in `key`.
    ///
    /// `NotFound` when the partition is missing, still empty, or the caller
    /// is not a member.
    pub fn get(&self, key: &PartitionKey, caller: &Participant) -> Result<Versioned<R>, StoreError> {
        self.authorize(key, caller)?;
        let partition = self.backend.load(key)?.ok_or(StoreError::NotFound)?;
        let sealed = partition.sealed.ok_or(StoreError::NotFound)?;
        Ok(Versioned {
            version: partition.version,
            record: unseal(&sealed)?,
        })
    }

    /// Read-modify-write one partition.
    ///
    /// `apply` receives the current record (`None` for an opened, empty
    /// partition) and returns the replacement. Nothing is written if
    /// `apply` fails. Concurrent updates of the same key run one at a time.
    pub fn update<E, F>(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        apply: F,
    ) -> Result<Versioned<R>, E>
    where
        E: From<StoreError>,
        F: FnOnce(Option<R>) -> Result<R, E>,
    {
        self.authorize(key, caller)?;

        let lock = self.key_lock(key);
        let _guard = lock.lock();

        let partition = self.backend.load(key)?.ok_or(StoreError::NotFound)?;
        let current = match partition.sealed.as_deref() {
            Some(bytes) => Some(unseal(bytes)?),
            None => None,
        };

        let next = apply(current)?;
        let sealed = seal(&next)?;
        let version = self
            .backend
            .compare_and_swap(key, partition.version, sealed)?;

        trace!("[pt-02] Partition {} now at version {}", key, version);
        Ok(Versioned {
            version,
            record: next,
        })
    }

    fn authorize(&self, key: &PartitionKey, caller: &Participant) -> Result<(), StoreError> {
        if self.groups.is_member(&key.group, caller) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn key_lock(&self, key: &PartitionKey) -> Arc<Mutex<()>> {
        self.locks.lock().entry(*key).or_default().clone()
    }
}

fn seal<R: Serialize>(record: &R) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(record).map_err(|e| StoreError::Codec(e.to_string()))
}

fn unseal<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Codec(e.to_string()))
}
