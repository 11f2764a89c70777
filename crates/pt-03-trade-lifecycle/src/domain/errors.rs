//! # Domain Errors

use super::value_objects::TradeState;
use pt_02_private_state::StoreError;
use thiserror::Error;

/// Trade lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    /// Caller outside the group, or no such trade. Deliberately identical.
    #[error("not found")]
    AccessDenied,

    /// The action is not allowed in the current state.
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

    /// The item is not available for sale.
    #[error("item unavailable")]
    ItemUnavailable,

    /// Delivery was already confirmed.
    #[error("delivery already confirmed")]
    AlreadyConfirmed,

    /// A listing needs a non-zero price.
    #[error("price must be non-zero")]
    ZeroPrice,

    /// Settlement transitions are reserved to the settling agent.
    #[error("caller is not the settlement agent")]
    NotSettlementAgent,

    /// Storage failure other than absence.
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for TradeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::AccessDenied,
            other => Self::Storage(other),
        }
    }
}
