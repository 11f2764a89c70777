//! # Inbound Ports

use crate::domain::{SettlementError, SettlementOutcome};
use async_trait::async_trait;
use shared_types::entities::{Address, PartitionKey};

/// Settlement bridge API - inbound port.
#[async_trait]
pub trait SettlementBridgeApi: Send + Sync {
    /// Settle a confirmed trade. Safe to call any number of times.
    async fn on_confirmed(&self, key: PartitionKey)
        -> Result<SettlementOutcome, SettlementError>;

    /// Try once more to settle every trade in [`pending`](Self::pending).
    async fn redrive(&self) -> Vec<(PartitionKey, Result<SettlementOutcome, SettlementError>)>;

    /// Escrow that funds payouts.
    fn bind_escrow(&self, escrow: Address);

    /// Confirmed, unsettled trades a re-drive would pick up: those never
    /// attempted and those whose attempts failed, minus any that exhausted
    /// `max_attempts`.
    fn pending(&self) -> Vec<PartitionKey>;
}
