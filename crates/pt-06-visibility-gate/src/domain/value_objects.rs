//! # Value Objects

use pt_03_trade_lifecycle::{Delivery, ItemView, Order, PrivateEvent, TradeStatus};
use pt_04_escrow_ledger::PayoutReceipt;
use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, Amount, GroupId, ReceiptId};
use std::time::Duration;
use uuid::Uuid;

/// Gate configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Privacy-group support. When off, every group-scoped call is refused.
    pub private_tx_enabled: bool,
    /// Upper bound on waiting for a ledger commit.
    pub commit_timeout_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            private_tx_enabled: true,
            commit_timeout_ms: 5_000,
        }
    }
}

impl GateConfig {
    /// Commit timeout as a `Duration`.
    #[must_use]
    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }
}

/// Result value of a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutput {
    /// A contract was deployed.
    Deployed {
        /// Contract address.
        address: Address,
        /// Privacy group of a trading contract; `None` for an escrow.
        group: Option<GroupId>,
    },
    /// State change applied, nothing to return.
    Done,
    /// An escrow amount (balance, new balance after prepay, credited total).
    Amount(Amount),
    /// Escrow payout.
    Payout(PayoutReceipt),
    /// `getItem()`.
    Item(ItemView),
    /// `getItemName()`.
    Name(String),
    /// `getItemPrice()`.
    Price(Amount),
    /// `_order()`.
    Order(Option<Order>),
    /// `_delivery()`.
    Delivery(Option<Delivery>),
    /// `status()`.
    Status(TradeStatus),
    /// `events()`.
    Events(Vec<PrivateEvent>),
}

/// Response to one call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResponse {
    /// Correlation id of the originating envelope.
    pub correlation_id: Uuid,
    /// Ledger receipt; `None` for read-only calls.
    pub receipt: Option<ReceiptId>,
    /// Call result.
    pub output: CallOutput,
}

impl CallResponse {
    /// Address of a deployed contract, if this was a deployment.
    #[must_use]
    pub fn deployed_address(&self) -> Option<Address> {
        match self.output {
            CallOutput::Deployed { address, .. } => Some(address),
            _ => None,
        }
    }
}
