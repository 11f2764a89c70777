//! # Domain Value Objects

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::entities::{Address, Amount, Hash, PartitionKey, ReceiptId};
use std::time::Duration;

/// Settlement configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Attempts before a trade is sent to the dead-letter topic.
    pub max_attempts: u32,
    /// Seconds between automatic re-drives of failed settlements.
    pub redrive_interval_secs: u64,
}

impl SettlementConfig {
    /// Re-drive interval as a `Duration`.
    pub fn redrive_interval(&self) -> Duration {
        Duration::from_secs(self.redrive_interval_secs.max(1))
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            redrive_interval_secs: 30,
        }
    }
}

/// What the bridge needs from a confirmed trade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementTerms {
    /// Payout target.
    pub seller: Address,
    /// Payout amount (the item price).
    pub amount: Amount,
    /// Whether the trade is already `Settled`.
    pub already_settled: bool,
}

/// A payout as seen by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutRecord {
    /// Escrow receipt.
    pub receipt: ReceiptId,
    /// The escrow had already paid this reference.
    pub replayed: bool,
}

/// Result of one settlement attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Payout done and the trade marked `Settled`.
    Settled {
        /// Escrow receipt.
        receipt: ReceiptId,
    },
    /// Nothing to do; the trade was settled earlier.
    AlreadySettled,
    /// Another settlement of the same trade is running.
    InProgress,
    /// The payout failed and was recorded.
    Failed {
        /// Attempts so far.
        attempts: u32,
        /// Failure reason.
        reason: String,
    },
}

/// Payout reference for a trade: stable across retries and processes.
pub fn settlement_reference(key: &PartitionKey) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(b"pt-settlement-v1");
    hasher.update(key.group.0);
    hasher.update(key.trade.0);
    hasher.finalize().into()
}
