//! Escrow Payout Adapter
//!
//! Implements `PayoutGateway` with referenced `payTo` calls.

use crate::domain::{PayoutFailure, PayoutRecord, SettlementError};
use crate::ports::PayoutGateway;
use async_trait::async_trait;
use pt_04_escrow_ledger::{EscrowError, EscrowLedgerApi, Payout};
use shared_types::entities::{Address, Amount, Hash};
use std::sync::Arc;

/// Pays out through the escrow ledger.
pub struct EscrowPayoutAdapter {
    ledger: Arc<dyn EscrowLedgerApi>,
}

impl EscrowPayoutAdapter {
    /// Wrap an escrow ledger.
    pub fn new(ledger: Arc<dyn EscrowLedgerApi>) -> Self {
        Self { ledger }
    }
}

/// Escrow errors name the requested amount; only the category goes public.
fn map_escrow_error(err: EscrowError) -> SettlementError {
    let kind = match &err {
        EscrowError::InsufficientFunds { .. } => PayoutFailure::InsufficientFunds,
        EscrowError::Unauthorized => PayoutFailure::Unauthorized,
        EscrowError::InvalidTarget => PayoutFailure::InvalidTarget,
        EscrowError::ZeroAmount => PayoutFailure::ZeroAmount,
        EscrowError::Overflow => PayoutFailure::Overflow,
        EscrowError::EscrowNotFound(_) | EscrowError::AlreadyDeployed(_) => {
            PayoutFailure::EscrowNotFound
        }
        EscrowError::ReferenceConflict => PayoutFailure::ReferenceConflict,
    };
    SettlementError::payout(kind, err.to_string())
}

#[async_trait]
impl PayoutGateway for EscrowPayoutAdapter {
    async fn pay(
        &self,
        escrow: Address,
        payer: Address,
        to: Address,
        amount: Amount,
        reference: Hash,
    ) -> Result<PayoutRecord, SettlementError> {
        let payout = self
            .ledger
            .pay_to_with_reference(escrow, payer, to, amount, reference)
            .await
            .map_err(map_escrow_error)?;

        Ok(PayoutRecord {
            receipt: payout.receipt().receipt,
            replayed: matches!(payout, Payout::AlreadyPaid(_)),
        })
    }
}
