//! # Adapter Implementations
//!
//! Runtime-level adapters that implement one subsystem's outbound port with
//! another subsystem's service. They live here because neither subsystem
//! crate may depend on the other.
//!
//! ```text
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │ Settlement Bridge (5)    │        │ Visibility Gate (6)      │
//! │  trait PayoutGateway     │        │  trait LedgerClient      │
//! └────────────┬─────────────┘        └────────────┬─────────────┘
//!              │ implemented by                     │ used by
//!              └──────────► CommittedPayoutGateway ◄┘
//!                                   │ then applies via
//!                                   ▼
//!                           Escrow Ledger (4)
//! ```

pub mod committed_payout;

pub use committed_payout::CommittedPayoutGateway;
