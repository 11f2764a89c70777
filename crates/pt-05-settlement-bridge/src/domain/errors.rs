//! # Domain Errors
//!
//! `Display` output of these errors leaves the partition: it is logged, put
//! in `SettlementFailed` and dead-letter events, and returned to callers. It
//! therefore never contains an amount. The full refusal text travels in
//! [`SettlementError::private_detail`] and is written only to the trade's own
//! event log.

use thiserror::Error;

/// Why the public side refused a payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PayoutFailure {
    /// The escrow balance does not cover the price.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The agent does not own the bound escrow.
    #[error("agent is not the escrow owner")]
    Unauthorized,

    /// The seller address is not payable.
    #[error("invalid payout target")]
    InvalidTarget,

    /// Zero-value payout.
    #[error("zero amount")]
    ZeroAmount,

    /// Balance arithmetic overflowed.
    #[error("balance overflow")]
    Overflow,

    /// The bound escrow does not exist.
    #[error("escrow not found")]
    EscrowNotFound,

    /// The settlement reference was used for a different payout.
    #[error("payout reference reused with different terms")]
    ReferenceConflict,

    /// The payout could not be committed to the ledger.
    #[error("ledger unavailable")]
    Ledger,
}

/// Settlement errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The agent cannot see the trade (not a member, or no such trade).
    #[error("trade not found")]
    TradeUnavailable,

    /// The trade has not reached `Confirmed`.
    #[error("trade not confirmed (state {state})")]
    NotConfirmed {
        /// Current lifecycle state.
        state: String,
    },

    /// No escrow has been bound for payouts.
    #[error("no escrow bound for settlement")]
    NoEscrow,

    /// The public side refused the payout.
    #[error("payout failed: {kind}")]
    Payout {
        /// Amount-free category.
        kind: PayoutFailure,
        /// Full refusal text, for the trade's private log only.
        detail: String,
    },

    /// The outcome could not be written back to the trade.
    #[error("failed to record settlement outcome: {0}")]
    Record(String),
}

impl SettlementError {
    /// Payout refusal of `kind`, keeping `detail` for the private log.
    pub fn payout(kind: PayoutFailure, detail: impl Into<String>) -> Self {
        Self::Payout {
            kind,
            detail: detail.into(),
        }
    }

    /// Text to record inside the trade's partition.
    pub fn private_detail(&self) -> String {
        match self {
            Self::Payout { kind, detail } if !detail.is_empty() => {
                format!("payout failed: {kind} ({detail})")
            }
            other => other.to_string(),
        }
    }
}
