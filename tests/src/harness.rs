//! # Engine Test Harness
//!
//! A fully wired engine plus the four demo participants, driven only through
//! the visibility gate the way real callers would.

use std::sync::Arc;
use std::time::Duration;

use node_runtime::container::{NodeConfig, SubsystemContainer};
use node_runtime::scenario::{Cast, DEMO_PRICE};
use pt_05_settlement_bridge::SettlementBridgeApi;
use pt_06_visibility_gate::{
    CallOutput, CallResponse, ContractCall, GateError, VisibilityGateApi,
};
use shared_bus::{EngineEvent, EventFilter, EventTopic, Subscription};
use shared_types::entities::{Address, Amount, GroupId, Participant, TradeId, U256};
use shared_types::envelope::CallEnvelope;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Item name used by every listing; must never leak.
pub const SECRET_NAME: &str = "A secret data";

/// Item description used by every listing; must never leak.
pub const SECRET_DESCRIPTION: &str = "Some secret data";

/// Content id used by every delivery; must never leak.
pub const SECRET_CID: &str = "cid1";

/// Wired engine with its cast.
pub struct EngineHarness {
    /// All subsystems.
    pub container: Arc<SubsystemContainer>,
    /// Seller A, buyer B, agent P, outsider D.
    pub cast: Cast,
    shutdown_tx: watch::Sender<bool>,
    worker: Option<JoinHandle<()>>,
}

impl EngineHarness {
    /// Engine with default configuration, no worker running.
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    /// Engine with `config`, no worker running.
    pub fn with_config(config: NodeConfig) -> Self {
        let container = Arc::new(SubsystemContainer::new(config));
        let cast = Cast::demo(container.agent().clone());
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container,
            cast,
            shutdown_tx,
            worker: None,
        }
    }

    /// Start the settlement worker.
    pub fn spawn_worker(&mut self) {
        let worker = self.container.settlement_worker();
        let shutdown = self.shutdown_tx.subscribe();
        self.worker = Some(tokio::spawn(worker.run(shutdown)));
    }

    /// Stop the settlement worker, if running.
    pub async fn stop_worker(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(worker) = self.worker.take() {
            let _ = timeout(Duration::from_secs(2), worker).await;
        }
    }

    /// Demo price.
    pub fn price(&self) -> Amount {
        U256::from(DEMO_PRICE)
    }

    /// The three members of every demo group.
    pub fn members(&self) -> Vec<Participant> {
        vec![
            self.cast.seller.clone(),
            self.cast.buyer.clone(),
            self.cast.agent.clone(),
        ]
    }

    /// Execute a public call.
    pub async fn public(
        &self,
        caller: &Participant,
        call: ContractCall,
    ) -> Result<CallResponse, GateError> {
        self.container
            .gate
            .execute(CallEnvelope::public(caller.clone(), call))
            .await
    }

    /// Execute a call scoped to `group`.
    pub async fn private(
        &self,
        caller: &Participant,
        group: GroupId,
        call: ContractCall,
    ) -> Result<CallResponse, GateError> {
        self.container
            .gate
            .execute(CallEnvelope::private(caller.clone(), group, call))
            .await
    }

    /// Seller deploys a trading contract private to the demo group.
    pub async fn deploy_trade(&self) -> (GroupId, TradeId) {
        let response = self
            .public(
                &self.cast.seller,
                ContractCall::DeployTradingContract {
                    participants: self.members(),
                },
            )
            .await
            .expect("deploy trading contract");
        match response.output {
            CallOutput::Deployed {
                address,
                group: Some(group),
            } => (group, TradeId(address)),
            other => panic!("unexpected deploy output: {other:?}"),
        }
    }

    /// Agent deploys an escrow and binds it to the settlement bridge.
    pub async fn deploy_escrow(&self) -> Address {
        let response = self
            .public(&self.cast.agent, ContractCall::DeployEscrow)
            .await
            .expect("deploy escrow");
        let escrow = response.deployed_address().expect("escrow address");
        self.container.bridge.bind_escrow(escrow);
        escrow
    }

    /// Buyer prepays `amount` into `escrow`.
    pub async fn prepay(&self, escrow: Address, amount: Amount) {
        self.public(&self.cast.buyer, ContractCall::Prepay { escrow, amount })
            .await
            .expect("prepay");
    }

    /// Public escrow balance.
    pub async fn balance(&self, escrow: Address) -> Amount {
        match self
            .public(&self.cast.outsider, ContractCall::GetBalance { escrow })
            .await
            .expect("balance")
            .output
        {
            CallOutput::Amount(amount) => amount,
            other => panic!("unexpected balance output: {other:?}"),
        }
    }

    /// Total paid from `escrow` to `to`.
    pub async fn credited(&self, escrow: Address, to: Address) -> Amount {
        match self
            .public(&self.cast.outsider, ContractCall::Credited { escrow, to })
            .await
            .expect("credited")
            .output
        {
            CallOutput::Amount(amount) => amount,
            other => panic!("unexpected credited output: {other:?}"),
        }
    }

    /// List, buy, deliver: the trade ends `Delivered`.
    pub async fn advance_to_delivered(&self, group: GroupId, contract: TradeId) {
        self.private(
            &self.cast.seller,
            group,
            ContractCall::SetItem {
                contract,
                price: self.price(),
                name: SECRET_NAME.to_string(),
                description: SECRET_DESCRIPTION.to_string(),
            },
        )
        .await
        .expect("setItem");
        self.private(
            &self.cast.buyer,
            group,
            ContractCall::Buy {
                contract,
                buyer_pub_key: self.cast.buyer.to_hex(),
            },
        )
        .await
        .expect("buy");
        self.private(
            &self.cast.seller,
            group,
            ContractCall::Deliver {
                contract,
                content_id: SECRET_CID.to_string(),
                symmetric_key_encrypted: "encKey".to_string(),
            },
        )
        .await
        .expect("deliver");
    }

    /// Buyer confirms.
    pub async fn confirm(
        &self,
        group: GroupId,
        contract: TradeId,
    ) -> Result<CallResponse, GateError> {
        self.private(&self.cast.buyer, group, ContractCall::Confirm { contract })
            .await
    }

    /// Subscription to settlement outcomes.
    pub fn settlements(&self) -> Subscription {
        self.container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Settlement]))
    }
}

impl Default for EngineHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for `SettlementCompleted` for `contract`.
pub async fn wait_settled(
    subscription: &mut Subscription,
    contract: TradeId,
    within: Duration,
) -> bool {
    timeout(within, async {
        while let Some(event) = subscription.recv().await {
            if let EngineEvent::SettlementCompleted { trade, .. } = event {
                if trade == contract {
                    return true;
                }
            }
        }
        false
    })
    .await
    .unwrap_or(false)
}
