//! # Domain Errors

use shared_types::entities::{short_hex, Address, Amount};
use thiserror::Error;

/// Escrow ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// Payout exceeds the balance.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Requested payout.
        requested: Amount,
        /// Current balance.
        available: Amount,
    },

    /// Caller is not the escrow owner.
    #[error("unauthorized: caller is not the escrow owner")]
    Unauthorized,

    /// Payout target is the zero address.
    #[error("invalid payout target")]
    InvalidTarget,

    /// Zero-value deposit.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// Balance arithmetic overflowed.
    #[error("balance overflow")]
    Overflow,

    /// No escrow at this address.
    #[error("escrow not found: {}", short_hex(.0))]
    EscrowNotFound(Address),

    /// An escrow already exists at this address.
    #[error("escrow already deployed: {}", short_hex(.0))]
    AlreadyDeployed(Address),

    /// A settlement reference was reused for a different payout.
    #[error("payout reference reused with different terms")]
    ReferenceConflict,
}
