//! # PT-05 Settlement Bridge
//!
//! Turns a privately established fact (delivery confirmed) into exactly one
//! public effect (escrow payout to the seller) without publishing anything
//! from the private partition.
//!
//! **Subsystem ID:** 5
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Flow
//!
//! ```text
//! Trade(3) ──DeliveryConfirmed{key}──→ Event Bus ──→ SettlementWorker
//!                                                         │
//!                                    read price/seller as agent (private)
//!                                                         │
//!                                          payTo(seller, price, ref) ──→ Escrow(4)
//!                                                         │
//!                                     mark Settled  /  record Failed{attempts}
//! ```
//!
//! ## At Most One Payout Per Trade
//!
//! Three layers, any one of which stops a second transfer:
//!
//! | Layer | Where |
//! |-------|-------|
//! | In-flight guard | one settlement per key at a time in this process |
//! | Settled state | a settled trade is never paid again |
//! | Payout reference | the escrow refuses to pay the same reference twice |
//!
//! ## Nothing Confirmed Is Left Behind
//!
//! The bus is best effort, so the trigger is not the source of truth. Every
//! re-drive covers all trades the lifecycle reports as confirmed and not yet
//! settled, whether or not their `DeliveryConfirmed` was ever received. The
//! worker re-drives at startup, on an interval, and as soon as it notices
//! its subscription overflowed.
//!
//! Failed payouts are recorded on the trade as a sub-state of `Confirmed`
//! and retried until `max_attempts`, after which a `CriticalError` goes to
//! the dead-letter topic and the trade is left to an operator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod worker;

pub use adapters::{EscrowPayoutAdapter, TradeSourceAdapter};
pub use domain::{
    settlement_reference, PayoutFailure, PayoutRecord, SettlementConfig, SettlementError,
    SettlementOutcome, SettlementTerms,
};
pub use ports::{PayoutGateway, SettlementBridgeApi, SettlementSource};
pub use service::SettlementBridge;
pub use worker::SettlementWorker;
