//! # Demonstration Scenario
//!
//! Drives the nine-scene trade through the visibility gate exactly as
//! participants would, and reports public results only.
//!
//! ```text
//! 1 deploy trading (A)   4 prepay (B)    7 confirm (B)
//! 2 deploy escrow (P)    5 buy (B)       8 settle (bridge, async)
//! 3 list item (A)        6 deliver (A)   9 outsider inspects (D)
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time::timeout;
use tracing::info;

use pt_05_settlement_bridge::SettlementBridgeApi;
use pt_06_visibility_gate::{
    CallOutput, CallResponse, ContractCall, GateError, VisibilityGateApi,
};
use shared_bus::{EngineEvent, EventFilter, EventTopic};
use shared_types::entities::{Address, Amount, GroupId, Participant, TradeId, U256};
use shared_types::envelope::CallEnvelope;

use crate::container::SubsystemContainer;

/// Price of the demo item (0.12 ether in wei).
pub const DEMO_PRICE: u64 = 120_000_000_000_000_000;

/// Participants of the demo.
#[derive(Clone, Debug)]
pub struct Cast {
    /// Seller (A).
    pub seller: Participant,
    /// Buyer (B).
    pub buyer: Participant,
    /// Settling agent (P).
    pub agent: Participant,
    /// Outsider (D), never in the group.
    pub outsider: Participant,
}

impl Cast {
    /// Fixed demo identities around the configured agent.
    pub fn demo(agent: Participant) -> Self {
        Self {
            seller: Participant::new(vec![0xA0; 33]),
            buyer: Participant::new(vec![0xB0; 33]),
            agent,
            outsider: Participant::new(vec![0xD0; 33]),
        }
    }
}

/// Public outcome of one scene.
#[derive(Clone, Debug, Serialize)]
pub struct SceneReport {
    /// Scene number, 1-based.
    pub scene: u8,
    /// Scene name.
    pub name: &'static str,
    /// Ledger receipt, if the scene committed a call.
    pub receipt: Option<String>,
    /// Public result values.
    pub result: Value,
}

/// Scenario failures.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A call failed where the script expects success.
    #[error("scene {scene} ({name}) failed: {source}")]
    Scene {
        /// Scene number.
        scene: u8,
        /// Scene name.
        name: &'static str,
        /// Gate error.
        #[source]
        source: GateError,
    },

    /// A call returned something the script does not expect.
    #[error("scene {scene} returned an unexpected result")]
    UnexpectedOutput {
        /// Scene number.
        scene: u8,
    },

    /// The outsider was answered with something other than "not found".
    #[error("outsider read was not refused: {0}")]
    Disclosure(String),

    /// No settlement within the timeout.
    #[error("settlement not completed within {0:?}")]
    SettlementTimeout(Duration),

    /// The event bus closed while waiting.
    #[error("event bus closed")]
    BusClosed,
}

/// The nine-scene driver.
pub struct Scenario {
    container: Arc<SubsystemContainer>,
    cast: Cast,
    settle_timeout: Duration,
}

impl Scenario {
    /// Create a driver over a running container.
    pub fn new(container: Arc<SubsystemContainer>, cast: Cast) -> Self {
        Self {
            container,
            cast,
            settle_timeout: Duration::from_secs(10),
        }
    }

    /// Override how long scene 8 waits for the settlement.
    pub fn with_settle_timeout(mut self, settle_timeout: Duration) -> Self {
        self.settle_timeout = settle_timeout;
        self
    }

    async fn call(
        &self,
        scene: u8,
        name: &'static str,
        caller: &Participant,
        group: Option<GroupId>,
        call: ContractCall,
    ) -> Result<CallResponse, ScenarioError> {
        info!(scene, name, "[scenario] Running scene");
        let envelope = match group {
            Some(group) => CallEnvelope::private(caller.clone(), group, call),
            None => CallEnvelope::public(caller.clone(), call),
        };
        self.container
            .gate
            .execute(envelope)
            .await
            .map_err(|source| ScenarioError::Scene {
                scene,
                name,
                source,
            })
    }

    /// Run all nine scenes in order.
    ///
    /// Requires a settlement worker running on the container's bus.
    pub async fn run(&self) -> Result<Vec<SceneReport>, ScenarioError> {
        let cast = &self.cast;
        let price = U256::from(DEMO_PRICE);
        let mut reports = Vec::with_capacity(9);

        // 1. Trading contract, private to {A, B, P}.
        let name = "deploy trading contract";
        let participants = vec![cast.seller.clone(), cast.buyer.clone(), cast.agent.clone()];
        let response = self
            .call(
                1,
                name,
                &cast.seller,
                None,
                ContractCall::DeployTradingContract { participants },
            )
            .await?;
        let (contract, group) = match response.output {
            CallOutput::Deployed {
                address,
                group: Some(group),
            } => (TradeId(address), group),
            _ => return Err(ScenarioError::UnexpectedOutput { scene: 1 }),
        };
        reports.push(report(
            1,
            name,
            &response,
            json!({ "contract": hex_address(&contract.0), "group": hex_bytes(&group.0) }),
        ));

        // 2. Public escrow owned by the agent.
        let name = "deploy escrow";
        let response = self
            .call(2, name, &cast.agent, None, ContractCall::DeployEscrow)
            .await?;
        let escrow = response
            .deployed_address()
            .ok_or(ScenarioError::UnexpectedOutput { scene: 2 })?;
        self.container.bridge.bind_escrow(escrow);
        reports.push(report(2, name, &response, json!({ "escrow": hex_address(&escrow) })));

        // 3. Seller lists the item.
        let name = "list item";
        let response = self
            .call(
                3,
                name,
                &cast.seller,
                Some(group),
                ContractCall::SetItem {
                    contract,
                    price,
                    name: "A secret data".to_string(),
                    description: "Some secret data only the group may read".to_string(),
                },
            )
            .await?;
        reports.push(report(3, name, &response, json!({})));

        // 4. Buyer funds the escrow.
        let name = "prepay";
        let response = self
            .call(
                4,
                name,
                &cast.buyer,
                None,
                ContractCall::Prepay {
                    escrow,
                    amount: price,
                },
            )
            .await?;
        let balance = amount_of(&response, 4)?;
        reports.push(report(4, name, &response, json!({ "balance": balance.to_string() })));

        // 5. Buyer orders.
        let name = "buy";
        let response = self
            .call(
                5,
                name,
                &cast.buyer,
                Some(group),
                ContractCall::Buy {
                    contract,
                    buyer_pub_key: cast.buyer.to_hex(),
                },
            )
            .await?;
        reports.push(report(5, name, &response, json!({})));

        // 6. Seller delivers.
        let name = "deliver";
        let response = self
            .call(
                6,
                name,
                &cast.seller,
                Some(group),
                ContractCall::Deliver {
                    contract,
                    content_id: "cid1".to_string(),
                    symmetric_key_encrypted: "encrypted-symmetric-key".to_string(),
                },
            )
            .await?;
        reports.push(report(6, name, &response, json!({})));

        // 7. Buyer confirms; settlement follows asynchronously.
        let mut settlements = self
            .container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Settlement]));
        let name = "confirm";
        let response = self
            .call(
                7,
                name,
                &cast.buyer,
                Some(group),
                ContractCall::Confirm { contract },
            )
            .await?;
        reports.push(report(7, name, &response, json!({})));

        // 8. Wait for the bridge to pay the seller.
        let name = "settle";
        let waited = timeout(self.settle_timeout, async {
            while let Some(event) = settlements.recv().await {
                if let EngineEvent::SettlementCompleted { trade, receipt } = event {
                    if trade == contract {
                        return Some(receipt);
                    }
                }
            }
            None
        })
        .await
        .map_err(|_| ScenarioError::SettlementTimeout(self.settle_timeout))?;
        let payout = waited.ok_or(ScenarioError::BusClosed)?;

        let balance = self
            .call(8, name, &cast.agent, None, ContractCall::GetBalance { escrow })
            .await
            .and_then(|r| amount_of(&r, 8))?;
        let credited = self
            .call(
                8,
                name,
                &cast.agent,
                None,
                ContractCall::Credited {
                    escrow,
                    to: cast.seller.address(),
                },
            )
            .await
            .and_then(|r| amount_of(&r, 8))?;
        reports.push(SceneReport {
            scene: 8,
            name,
            receipt: Some(payout.to_string()),
            result: json!({
                "balance": balance.to_string(),
                "seller_credited": credited.to_string(),
            }),
        });

        // 9. Outsider tries to read the item name.
        let name = "unauthorized inspect";
        let refused = self
            .container
            .gate
            .execute(CallEnvelope::private(
                cast.outsider.clone(),
                group,
                ContractCall::GetItemName { contract },
            ))
            .await;
        match refused {
            Err(GateError::AccessDenied) => reports.push(SceneReport {
                scene: 9,
                name,
                receipt: None,
                result: json!({ "error": GateError::AccessDenied.to_string() }),
            }),
            Err(other) => return Err(ScenarioError::Disclosure(other.to_string())),
            Ok(_) => return Err(ScenarioError::Disclosure("value returned".to_string())),
        }

        info!("[scenario] All scenes completed");
        Ok(reports)
    }
}

fn report(scene: u8, name: &'static str, response: &CallResponse, result: Value) -> SceneReport {
    SceneReport {
        scene,
        name,
        receipt: response.receipt.map(|r| r.to_string()),
        result,
    }
}

fn amount_of(response: &CallResponse, scene: u8) -> Result<Amount, ScenarioError> {
    match response.output {
        CallOutput::Amount(amount) => Ok(amount),
        _ => Err(ScenarioError::UnexpectedOutput { scene }),
    }
}

fn hex_address(address: &Address) -> String {
    hex_bytes(address)
}

fn hex_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
