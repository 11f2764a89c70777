//! # PT-01 Group Membership
//!
//! Immutable privacy groups identified by a deterministic fingerprint.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports)
//!
//! ## Purpose
//!
//! A privacy group is the fixed participant set allowed to see and act on
//! one trade's private state. Every other subsystem asks this one whether a
//! caller belongs to a group; nothing else decides membership.
//!
//! ## Guarantees
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | At least two members | `create` rejects smaller sets |
//! | No duplicate identities | `create` rejects repeated keys |
//! | Membership never changes | groups have no mutating operation |
//! | Same members, same id | SHA-256 over sorted, length-prefixed keys |
//!
//! ## Module Structure
//!
//! ```text
//! pt-01-group-membership/
//! ├── domain/     # PrivacyGroup, fingerprint, errors, invariants
//! ├── ports/      # GroupMembershipApi
//! └── service.rs  # GroupRegistry
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    group_fingerprint, invariant_member_bounds, invariant_unique_members, GroupConfig,
    GroupError, PrivacyGroup,
};
pub use ports::GroupMembershipApi;
pub use service::GroupRegistry;
