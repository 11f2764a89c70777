//! # Outbound Ports
//!
//! What the bridge needs from the trade lifecycle and the escrow ledger.

use crate::domain::{PayoutRecord, SettlementError, SettlementTerms};
use async_trait::async_trait;
use shared_types::entities::{Address, Amount, Hash, Participant, PartitionKey, ReceiptId};

/// Access to confirmed trades, as the settling agent.
pub trait SettlementSource: Send + Sync {
    /// Seller, price and settled flag. Fails unless the trade is `Confirmed`
    /// or already `Settled`.
    fn terms(&self, key: &PartitionKey, agent: &Participant)
        -> Result<SettlementTerms, SettlementError>;

    /// Move the trade to `Settled`.
    fn mark_settled(
        &self,
        key: &PartitionKey,
        agent: &Participant,
        receipt: ReceiptId,
    ) -> Result<(), SettlementError>;

    /// Confirmed trades not yet settled.
    fn unsettled(&self, agent: &Participant) -> Result<Vec<PartitionKey>, SettlementError>;

    /// Record a failed attempt; returns the attempt count. `reason` is kept
    /// inside the trade's partition.
    fn record_failure(
        &self,
        key: &PartitionKey,
        agent: &Participant,
        reason: String,
    ) -> Result<u32, SettlementError>;
}

/// Public payout execution.
#[async_trait]
pub trait PayoutGateway: Send + Sync {
    /// Pay `amount` from `escrow` to `to`, tagged with `reference`.
    async fn pay(
        &self,
        escrow: Address,
        payer: Address,
        to: Address,
        amount: Amount,
        reference: Hash,
    ) -> Result<PayoutRecord, SettlementError>;
}
