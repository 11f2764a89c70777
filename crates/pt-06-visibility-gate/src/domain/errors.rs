//! # Domain Errors
//!
//! `GateError` is what a caller sees. Subsystem errors are folded into it
//! here; anything that could tell a non-member more than "not found" becomes
//! `AccessDenied`.

use pt_01_group_membership::GroupError;
use pt_03_trade_lifecycle::{TradeError, TradeState};
use pt_04_escrow_ledger::EscrowError;
use shared_types::entities::{short_hex, Address, Amount, ReceiptId};
use thiserror::Error;

/// Caller-facing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The participant set cannot form a valid privacy group.
    #[error("invalid group: {reason}")]
    InvalidGroup {
        /// Reason, without participant data.
        reason: String,
    },

    /// Non-member, unscoped or missing trade. Deliberately identical.
    #[error("not found")]
    AccessDenied,

    /// Transition attempted out of order.
    #[error("invalid state: cannot {action} while {state}")]
    InvalidState {
        /// Current state.
        state: TradeState,
        /// Attempted action.
        action: &'static str,
    },

    /// Caller is not the seller.
    #[error("caller is not the seller")]
    NotSeller,

    /// Caller is not the buyer.
    #[error("caller is not the buyer")]
    NotBuyer,

    /// Item not available for sale.
    #[error("item unavailable")]
    ItemUnavailable,

    /// Delivery already confirmed.
    #[error("delivery already confirmed")]
    AlreadyConfirmed,

    /// Zero listing price.
    #[error("price must be non-zero")]
    ZeroPrice,

    /// Payout exceeds the escrow balance.
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

    /// Payout to the zero address.
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

    /// Group-scoped call while private transactions are disabled.
    #[error("private transactions are disabled")]
    PrivateTxDisabled,

    /// Envelope version not understood.
    #[error("unsupported call version: {0}")]
    UnsupportedVersion(u16),

    /// The ledger refused the submission.
    #[error("submission failed: {0}")]
    Submission(String),

    /// No commit confirmation within the configured timeout.
    #[error("commit not confirmed in time: {0}")]
    CommitTimeout(ReceiptId),

    /// Unexpected internal failure (storage, encoding).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GroupError> for GateError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::InvalidGroup { reason } => Self::InvalidGroup { reason },
        }
    }
}

impl From<TradeError> for GateError {
    fn from(err: TradeError) -> Self {
        match err {
            TradeError::AccessDenied => Self::AccessDenied,
            TradeError::InvalidState { state, action } => Self::InvalidState { state, action },
            TradeError::NotSeller => Self::NotSeller,
            TradeError::NotBuyer => Self::NotBuyer,
            TradeError::ItemUnavailable => Self::ItemUnavailable,
            TradeError::AlreadyConfirmed => Self::AlreadyConfirmed,
            TradeError::ZeroPrice => Self::ZeroPrice,
            other @ (TradeError::NotSettlementAgent | TradeError::Storage(_)) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<EscrowError> for GateError {
    fn from(err: EscrowError) -> Self {
        match err {
            EscrowError::InsufficientFunds {
                requested,
                available,
            } => Self::InsufficientFunds {
                requested,
                available,
            },
            EscrowError::Unauthorized => Self::Unauthorized,
            EscrowError::InvalidTarget => Self::InvalidTarget,
            EscrowError::ZeroAmount => Self::ZeroAmount,
            EscrowError::Overflow => Self::Overflow,
            EscrowError::EscrowNotFound(address) => Self::EscrowNotFound(address),
            other @ (EscrowError::AlreadyDeployed(_) | EscrowError::ReferenceConflict) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<bincode::Error> for GateError {
    fn from(err: bincode::Error) -> Self {
        Self::Internal(format!("encoding: {err}"))
    }
}
