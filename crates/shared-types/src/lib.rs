//! # Shared Types Crate
//!
//! Identities, identifiers and the `CallEnvelope<T>` request descriptor used
//! across all Privy-Trade subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Typed Scope**: A request's privacy scope is an explicit
//!   `Option<GroupId>` on the envelope; absence means public.
//! - **Caller Authority**: The envelope's `caller` is the authenticated
//!   identity. Payloads MUST NOT carry a second, competing identity.

pub mod entities;
pub mod envelope;

pub use entities::*;
pub use envelope::CallEnvelope;
