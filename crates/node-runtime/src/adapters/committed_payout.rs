//! # Committed Payout Adapter
//!
//! Implements the settlement bridge's `PayoutGateway` the way the gate
//! executes a caller's `payTo`: the call is submitted to the ledger client
//! as a public transaction from the agent, and the escrow is only touched
//! once that submission is committed.
//!
//! The public payload is the plain `payTo(escrow, to, amount)` call, exactly
//! what a manual payout would show. A re-drive of a trade that was already
//! paid commits again, and the escrow's reference check makes that second
//! application move nothing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use pt_05_settlement_bridge::{
    EscrowPayoutAdapter, PayoutFailure, PayoutGateway, PayoutRecord, SettlementError,
};
use pt_06_visibility_gate::{ContractCall, LedgerClient, Submission, SubmissionScope};
use shared_types::entities::{short_hex, Address, Amount, Hash};

/// `PayoutGateway` that commits through the ledger before paying.
pub struct CommittedPayoutGateway {
    ledger: Arc<dyn LedgerClient>,
    escrow: EscrowPayoutAdapter,
    commit_timeout: Duration,
}

impl CommittedPayoutGateway {
    /// Commit through `ledger`, then apply with `escrow`.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        escrow: EscrowPayoutAdapter,
        commit_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            escrow,
            commit_timeout,
        }
    }

    async fn commit(
        &self,
        payer: Address,
        call: &ContractCall,
    ) -> Result<(), SettlementError> {
        let ledger_error = |e: &dyn std::fmt::Display| {
            SettlementError::payout(PayoutFailure::Ledger, e.to_string())
        };

        let payload = bincode::serialize(call).map_err(|e| ledger_error(&e))?;
        let submission = Submission {
            correlation_id: Uuid::new_v4(),
            sender: payer,
            scope: SubmissionScope::Public { payload },
        };
        let correlation_id = submission.correlation_id;

        let receipt = self
            .ledger
            .submit(submission)
            .await
            .map_err(|e| ledger_error(&e))?;
        if let Err(e) = self.ledger.wait_for_commit(receipt, self.commit_timeout).await {
            warn!(%correlation_id, %receipt, "[runtime] Settlement payout not committed: {}", e);
            return Err(ledger_error(&e));
        }
        debug!(%correlation_id, %receipt, "[runtime] Settlement payout committed");
        Ok(())
    }
}

#[async_trait]
impl PayoutGateway for CommittedPayoutGateway {
    async fn pay(
        &self,
        escrow: Address,
        payer: Address,
        to: Address,
        amount: Amount,
        reference: Hash,
    ) -> Result<PayoutRecord, SettlementError> {
        let call = ContractCall::PayTo { escrow, to, amount };
        self.commit(payer, &call).await?;
        debug!(escrow = %short_hex(&escrow), "[runtime] Applying committed payout");
        self.escrow.pay(escrow, payer, to, amount, reference).await
    }
}
