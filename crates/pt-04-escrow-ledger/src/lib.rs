//! # PT-04 Escrow Ledger
//!
//! Public escrow contracts: anyone deposits, only the owner pays out, the
//! balance never goes negative.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (DDD + Ports)
//!
//! Each escrow's balance sits behind its own mutex, so a deposit or payout
//! is one atomic read-modify-write. Payouts can carry a settlement
//! reference; paying the same reference twice returns the first receipt and
//! moves no funds.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{EscrowAccount, EscrowError, Payout, PayoutReceipt};
pub use ports::EscrowLedgerApi;
pub use service::EscrowLedger;
