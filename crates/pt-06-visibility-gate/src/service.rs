//! # Visibility Gate Service
//!
//! Implements `VisibilityGateApi`: scope check, ledger commit, then apply.

use crate::domain::{
    private_digest, CallKind, CallOutput, CallResponse, ContractCall, GateConfig, GateError,
};
use crate::ports::{LedgerClient, Submission, SubmissionScope, VisibilityGateApi};
use async_trait::async_trait;
use parking_lot::Mutex;
use pt_01_group_membership::GroupMembershipApi;
use pt_03_trade_lifecycle::TradeLifecycleApi;
use pt_04_escrow_ledger::EscrowLedgerApi;
use shared_bus::{EngineEvent, EventPublisher};
use shared_types::entities::{
    derive_contract_address, short_hex, Address, GroupId, Participant, PartitionKey, ReceiptId,
    TradeId,
};
use shared_types::envelope::CallEnvelope;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

type Envelope = CallEnvelope<ContractCall>;

/// The Visibility Gate service.
pub struct VisibilityGate {
    config: GateConfig,
    agent: Participant,
    groups: Arc<dyn GroupMembershipApi>,
    trades: Arc<dyn TradeLifecycleApi>,
    escrows: Arc<dyn EscrowLedgerApi>,
    ledger: Arc<dyn LedgerClient>,
    bus: Arc<dyn EventPublisher>,
    /// Deploy nonce per deployer account.
    nonces: Mutex<HashMap<Address, u64>>,
}

impl VisibilityGate {
    /// Create the gate over its collaborators.
    ///
    /// `agent` is the settling agent; every trading contract's group must
    /// include it.
    pub fn new(
        config: GateConfig,
        agent: Participant,
        groups: Arc<dyn GroupMembershipApi>,
        trades: Arc<dyn TradeLifecycleApi>,
        escrows: Arc<dyn EscrowLedgerApi>,
        ledger: Arc<dyn LedgerClient>,
        bus: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            agent,
            groups,
            trades,
            escrows,
            ledger,
            bus,
            nonces: Mutex::new(HashMap::new()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    fn next_nonce(&self, deployer: Address) -> u64 {
        let mut nonces = self.nonces.lock();
        let nonce = nonces.entry(deployer).or_insert(0);
        let current = *nonce;
        *nonce += 1;
        current
    }

    /// Check the envelope's group scope, if it claims one.
    fn authorize_scope(&self, envelope: &Envelope) -> Result<Option<GroupId>, GateError> {
        let Some(group) = envelope.group else {
            return Ok(None);
        };
        if !self.config.private_tx_enabled {
            return Err(GateError::PrivateTxDisabled);
        }
        if !self.groups.is_member(&group, &envelope.caller) {
            debug!(
                correlation_id = %envelope.correlation_id,
                "[pt-06] Scoped call from outside the group"
            );
            return Err(GateError::AccessDenied);
        }
        Ok(Some(group))
    }

    /// Submit and wait for the commit.
    async fn commit(
        &self,
        envelope: &Envelope,
        scope: SubmissionScope,
    ) -> Result<ReceiptId, GateError> {
        let submission = Submission {
            correlation_id: envelope.correlation_id,
            sender: envelope.caller.address(),
            scope,
        };
        let receipt = self.ledger.submit(submission).await?;
        self.ledger
            .wait_for_commit(receipt, self.config.commit_timeout())
            .await?;
        Ok(receipt)
    }

    async fn commit_public(&self, envelope: &Envelope) -> Result<ReceiptId, GateError> {
        let payload = bincode::serialize(&envelope.payload)?;
        self.commit(envelope, SubmissionScope::Public { payload }).await
    }

    async fn commit_private(
        &self,
        envelope: &Envelope,
        group: GroupId,
    ) -> Result<ReceiptId, GateError> {
        let digest = private_digest(&envelope.payload)?;
        self.commit(envelope, SubmissionScope::Private { group, digest })
            .await
    }

    async fn deploy_trading_contract(
        &self,
        envelope: &Envelope,
        participants: &[Participant],
    ) -> Result<CallResponse, GateError> {
        if !self.config.private_tx_enabled {
            return Err(GateError::PrivateTxDisabled);
        }
        let caller = &envelope.caller;
        if !participants.contains(caller) {
            return Err(GateError::InvalidGroup {
                reason: "deployer must be a participant".to_string(),
            });
        }
        if !participants.contains(&self.agent) {
            return Err(GateError::InvalidGroup {
                reason: "settlement agent must be a participant".to_string(),
            });
        }

        let group = self.groups.create(participants)?;
        if envelope.group.is_some_and(|claimed| claimed != group) {
            return Err(GateError::InvalidGroup {
                reason: "scope does not match participants".to_string(),
            });
        }

        let deployer = caller.address();
        let address = derive_contract_address(&deployer, self.next_nonce(deployer));
        let key = PartitionKey::new(group, TradeId(address));

        let receipt = self.commit_private(envelope, group).await?;
        self.trades.open(&key, caller)?;
        self.bus
            .publish(EngineEvent::TradingContractDeployed { key })
            .await;

        info!(%key, %receipt, "[pt-06] Trading contract deployed");
        Ok(committed(
            envelope,
            receipt,
            CallOutput::Deployed {
                address,
                group: Some(group),
            },
        ))
    }

    async fn deploy_escrow(&self, envelope: &Envelope) -> Result<CallResponse, GateError> {
        let owner = envelope.caller.address();
        let address = derive_contract_address(&owner, self.next_nonce(owner));

        let receipt = self.commit_public(envelope).await?;
        self.escrows.deploy(address, owner)?;
        self.bus
            .publish(EngineEvent::EscrowDeployed {
                escrow: address,
                owner,
            })
            .await;

        info!(
            escrow = %short_hex(&address),
            %receipt,
            "[pt-06] Escrow deployed"
        );
        Ok(committed(
            envelope,
            receipt,
            CallOutput::Deployed {
                address,
                group: None,
            },
        ))
    }

    async fn escrow_call(&self, envelope: &Envelope) -> Result<CallResponse, GateError> {
        let from = envelope.caller.address();
        match &envelope.payload {
            ContractCall::GetBalance { escrow } => {
                let balance = self.escrows.get_balance(*escrow)?;
                Ok(local(envelope, CallOutput::Amount(balance)))
            }
            ContractCall::Credited { escrow, to } => {
                let credited = self.escrows.credited(*escrow, *to)?;
                Ok(local(envelope, CallOutput::Amount(credited)))
            }
            ContractCall::Prepay { escrow, amount } => {
                let receipt = self.commit_public(envelope).await?;
                let balance = self.escrows.prepay(*escrow, from, *amount).await?;
                Ok(committed(envelope, receipt, CallOutput::Amount(balance)))
            }
            ContractCall::PayTo { escrow, to, amount } => {
                let receipt = self.commit_public(envelope).await?;
                let payout = self.escrows.pay_to(*escrow, from, *to, *amount).await?;
                Ok(committed(envelope, receipt, CallOutput::Payout(payout)))
            }
            other => Err(GateError::Internal(format!(
                "{} routed as escrow call",
                other.name()
            ))),
        }
    }

    fn trading_read(
        &self,
        envelope: &Envelope,
        key: &PartitionKey,
    ) -> Result<CallOutput, GateError> {
        let caller = &envelope.caller;
        let output = match &envelope.payload {
            ContractCall::GetItem { .. } => CallOutput::Item(self.trades.get_item(key, caller)?),
            ContractCall::GetItemName { .. } => {
                CallOutput::Name(self.trades.get_item_name(key, caller)?)
            }
            ContractCall::GetItemPrice { .. } => {
                CallOutput::Price(self.trades.get_item_price(key, caller)?)
            }
            ContractCall::Order { .. } => CallOutput::Order(self.trades.order(key, caller)?),
            ContractCall::Delivery { .. } => {
                CallOutput::Delivery(self.trades.delivery(key, caller)?)
            }
            ContractCall::Status { .. } => CallOutput::Status(self.trades.status(key, caller)?),
            ContractCall::Events { .. } => CallOutput::Events(self.trades.events(key, caller)?),
            other => {
                return Err(GateError::Internal(format!(
                    "{} routed as trading read",
                    other.name()
                )))
            }
        };
        Ok(output)
    }

    async fn trading_write(
        &self,
        envelope: &Envelope,
        key: &PartitionKey,
    ) -> Result<CallOutput, GateError> {
        let caller = &envelope.caller;
        let output = match &envelope.payload {
            ContractCall::SetItem {
                price,
                name,
                description,
                ..
            } => {
                self.trades
                    .set_item(key, caller, *price, name.clone(), description.clone())?;
                CallOutput::Done
            }
            ContractCall::UpdateItemPrice { price, .. } => {
                self.trades.update_item_price(key, caller, *price)?;
                CallOutput::Done
            }
            ContractCall::Buy { buyer_pub_key, .. } => {
                let order = self.trades.buy(key, caller, buyer_pub_key.clone())?;
                CallOutput::Order(Some(order))
            }
            ContractCall::Deliver {
                content_id,
                symmetric_key_encrypted,
                ..
            } => {
                let delivery = self.trades.deliver(
                    key,
                    caller,
                    content_id.clone(),
                    symmetric_key_encrypted.clone(),
                )?;
                CallOutput::Delivery(Some(delivery))
            }
            ContractCall::Confirm { .. } => {
                self.trades.confirm(key, caller).await?;
                CallOutput::Done
            }
            ContractCall::Withdraw { .. } => {
                self.trades.withdraw(key, caller)?;
                CallOutput::Done
            }
            other => {
                return Err(GateError::Internal(format!(
                    "{} routed as trading write",
                    other.name()
                )))
            }
        };
        Ok(output)
    }

    async fn trading_call(
        &self,
        envelope: &Envelope,
        scope: Option<GroupId>,
    ) -> Result<CallResponse, GateError> {
        // The public partition holds no trading contracts.
        let (Some(group), Some(contract)) = (scope, envelope.payload.contract()) else {
            return Err(GateError::AccessDenied);
        };
        let key = PartitionKey::new(group, contract);

        if envelope.payload.is_read_only() {
            let output = self.trading_read(envelope, &key)?;
            return Ok(local(envelope, output));
        }

        let receipt = self.commit_private(envelope, group).await?;
        let output = self.trading_write(envelope, &key).await?;
        Ok(committed(envelope, receipt, output))
    }

    async fn route(&self, envelope: &Envelope) -> Result<CallResponse, GateError> {
        if let ContractCall::DeployTradingContract { participants } = &envelope.payload {
            return self.deploy_trading_contract(envelope, participants).await;
        }

        let scope = self.authorize_scope(envelope)?;
        match envelope.payload.kind() {
            CallKind::Deploy => self.deploy_escrow(envelope).await,
            CallKind::Escrow => self.escrow_call(envelope).await,
            CallKind::Trading => self.trading_call(envelope, scope).await,
        }
    }
}

fn local(envelope: &Envelope, output: CallOutput) -> CallResponse {
    CallResponse {
        correlation_id: envelope.correlation_id,
        receipt: None,
        output,
    }
}

fn committed(envelope: &Envelope, receipt: ReceiptId, output: CallOutput) -> CallResponse {
    CallResponse {
        correlation_id: envelope.correlation_id,
        receipt: Some(receipt),
        output,
    }
}

#[async_trait]
impl VisibilityGateApi for VisibilityGate {
    async fn execute(&self, envelope: Envelope) -> Result<CallResponse, GateError> {
        if envelope.version != Envelope::CURRENT_VERSION {
            return Err(GateError::UnsupportedVersion(envelope.version));
        }

        let call = envelope.payload.name();
        let result = self.route(&envelope).await;

        match &result {
            Ok(response) => debug!(
                call,
                correlation_id = %envelope.correlation_id,
                committed = response.receipt.is_some(),
                "[pt-06] Call completed"
            ),
            Err(err) => debug!(
                call,
                correlation_id = %envelope.correlation_id,
                error = %err,
                "[pt-06] Call rejected"
            ),
        }
        result
    }
}
