//! # Domain Value Objects

use serde::{Deserialize, Serialize};
use shared_types::entities::ReceiptId;
use std::fmt;

/// Trade lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeState {
    /// Item listed and available.
    Listed,
    /// Bought; the item is no longer available.
    Ordered,
    /// Seller delivered the content reference.
    Delivered,
    /// Buyer confirmed; payout due.
    Confirmed,
    /// Payout completed.
    Settled,
    /// Listing withdrawn before any order.
    Void,
}

impl TradeState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: TradeState) -> bool {
        matches!(
            (self, next),
            (Self::Listed, Self::Ordered)
                | (Self::Listed, Self::Void)
                | (Self::Ordered, Self::Delivered)
                | (Self::Delivered, Self::Confirmed)
                | (Self::Confirmed, Self::Settled)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Void)
    }
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Settlement progress of a trade.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementStatus {
    /// Not confirmed yet.
    #[default]
    NotDue,
    /// Confirmed, payout not attempted or in flight.
    Pending,
    /// Payout attempts failed; retryable.
    Failed {
        /// Failed attempts so far.
        attempts: u32,
        /// Last failure, including detail kept out of public events.
        reason: String,
    },
    /// Payout completed.
    Settled {
        /// Escrow payout receipt.
        receipt: ReceiptId,
    },
}

impl SettlementStatus {
    /// Failed attempts recorded so far.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Failed { attempts, .. } => *attempts,
            _ => 0,
        }
    }
}
