//! # Adapters Layer

mod ledger;

pub use ledger::InMemoryLedger;
