//! # PT-06 Visibility Gate
//!
//! Single entry point for every contract call. Classifies each call as
//! public or private, checks its privacy scope, submits state-changing calls
//! to the ledger and only then applies them to the owning subsystem.
//!
//! **Subsystem ID:** 6
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Routing
//!
//! ```text
//! CallEnvelope<ContractCall>
//!        │
//!        ├─ Deploy*  ──→ Groups(1) + Ledger ──→ Trade(3).open / Escrow(4).deploy
//!        ├─ Escrow   ──→ Ledger (public payload) ──→ Escrow(4)
//!        └─ Trading  ──→ scope + membership ──→ Ledger (group, digest) ──→ Trade(3)
//! ```
//!
//! ## Non-Disclosure
//!
//! | Situation | Answer |
//! |-----------|--------|
//! | Caller outside the scoped group | `AccessDenied` ("not found") |
//! | Unknown group | `AccessDenied` ("not found") |
//! | Trading call without a group scope | `AccessDenied` ("not found") |
//! | Member, no such trade | `AccessDenied` ("not found") |
//!
//! A private submission carries the group id and a SHA-256 digest of the
//! encoded call, never the call itself. Logs name the operation, never its
//! arguments.
//!
//! ## Module Structure
//!
//! ```text
//! pt-06-visibility-gate/
//! ├── domain/
//! │   ├── calls.rs         # ContractCall, CallKind
//! │   ├── value_objects.rs # CallOutput, CallResponse, GateConfig
//! │   └── errors.rs        # GateError
//! ├── ports/
//! │   ├── inbound.rs       # VisibilityGateApi
//! │   └── outbound.rs      # LedgerClient, Submission
//! ├── adapters/
//! │   └── ledger.rs        # InMemoryLedger
//! └── service.rs           # VisibilityGate
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryLedger;
pub use domain::{
    private_digest, CallKind, CallOutput, CallResponse, ContractCall, GateConfig, GateError,
};
pub use ports::{LedgerClient, Submission, SubmissionScope, VisibilityGateApi};
pub use service::VisibilityGate;
