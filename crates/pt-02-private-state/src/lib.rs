//! # PT-02 Private State Store
//!
//! Per-`(GroupId, TradeId)` partitions readable and writable only by the
//! members of the owning privacy group.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Access Rules
//!
//! - A non-member gets `NotFound`, the same answer as for a partition that
//!   was never opened. There is no second error kind to tell them apart.
//! - Writes to one partition are serialized: a per-key lock is held for the
//!   whole read-modify-write, and the backend rejects stale versions.
//! - A write either fully commits or leaves the partition untouched.
//!
//! ## Storage
//!
//! Records are bincode-encoded before they reach the backend, so a backend
//! only ever holds opaque sealed bytes plus a version counter.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryPartitionBackend;
pub use domain::{Partition, StoreError, Versioned};
pub use ports::PartitionBackend;
pub use service::PrivateStateStore;
