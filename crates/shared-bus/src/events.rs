//! # Engine Events
//!
//! Defines all event types that flow through the shared bus.
//!
//! Events carry identifiers and PUBLIC values only. Anything stored inside a
//! private partition (item terms, order, delivery) stays in that partition's
//! own event log and never reaches the bus.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, Amount, PartitionKey, ReceiptId, TradeId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEvent {
    // =========================================================================
    // SUBSYSTEM 6: VISIBILITY GATE (deployments)
    // =========================================================================
    /// A trading contract was deployed and its private partition opened.
    TradingContractDeployed {
        /// Partition of the new contract.
        key: PartitionKey,
    },

    /// An escrow contract was deployed on the public partition.
    EscrowDeployed {
        /// Escrow contract address.
        escrow: Address,
        /// Owner allowed to pay out.
        owner: Address,
    },

    // =========================================================================
    // SUBSYSTEM 3: TRADE LIFECYCLE
    // =========================================================================
    /// A trade reached `Confirmed` and the record is durably stored.
    /// **Settlement trigger**, consumed by the settlement bridge (5).
    DeliveryConfirmed {
        /// Partition of the confirmed trade.
        key: PartitionKey,
    },

    // =========================================================================
    // SUBSYSTEM 4: ESCROW LEDGER (public facts)
    // =========================================================================
    /// Funds were deposited into an escrow (`Receive(from, value)`).
    FundsDeposited {
        /// Escrow contract address.
        escrow: Address,
        /// Depositor.
        from: Address,
        /// Deposited value.
        amount: Amount,
    },

    /// Funds were paid out of an escrow (`PayTo(to, value)`).
    FundsReleased {
        /// Escrow contract address.
        escrow: Address,
        /// Payout target.
        to: Address,
        /// Paid value.
        amount: Amount,
    },

    // =========================================================================
    // SUBSYSTEM 5: SETTLEMENT BRIDGE
    // =========================================================================
    /// The payout for a confirmed trade completed.
    SettlementCompleted {
        /// Settled trade.
        trade: TradeId,
        /// Escrow payout receipt.
        receipt: ReceiptId,
    },

    /// The payout for a confirmed trade failed and was recorded.
    SettlementFailed {
        /// Partition of the failed trade (needed for re-drive).
        key: PartitionKey,
        /// Attempts made so far.
        attempts: u32,
        /// Failure reason (public error text, no private values).
        reason: String,
    },

    // =========================================================================
    // CRITICAL EVENTS (DLQ)
    // =========================================================================
    /// A confirmed trade ran out of settlement attempts and needs an operator.
    CriticalError {
        /// Partition of the abandoned trade.
        key: PartitionKey,
        /// Last failure reason (public error text).
        error: String,
    },
}

impl EngineEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::TradingContractDeployed { .. } | Self::EscrowDeployed { .. } => {
                EventTopic::Deployment
            }
            Self::DeliveryConfirmed { .. } => EventTopic::TradeLifecycle,
            Self::FundsDeposited { .. } | Self::FundsReleased { .. } => EventTopic::Escrow,
            Self::SettlementCompleted { .. } | Self::SettlementFailed { .. } => {
                EventTopic::Settlement
            }
            Self::CriticalError { .. } => EventTopic::DeadLetterQueue,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Contract deployments.
    Deployment,
    /// Subsystem 3 events.
    TradeLifecycle,
    /// Subsystem 4 events.
    Escrow,
    /// Subsystem 5 events.
    Settlement,
    /// Dead Letter Queue for critical errors.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &EngineEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
