//! # End-to-End Trade Flows
//!
//! The demonstrated trade from deployment to payout, driven through the
//! visibility gate with the settlement worker running on the bus.
//!
//! ```text
//! A deploys (G = {A, B, P}) → P deploys escrow → A lists → B prepays
//!   → B buys → A delivers → B confirms → worker pays A → D reads: "not found"
//! ```

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::harness::{wait_settled, EngineHarness, SECRET_NAME};
    use node_runtime::container::NodeConfig;
    use node_runtime::scenario::Scenario;
    use pt_03_trade_lifecycle::{SettlementStatus, TradeLifecycleApi, TradeState};
    use pt_05_settlement_bridge::{SettlementBridgeApi, SettlementOutcome};
    use pt_06_visibility_gate::{CallOutput, ContractCall, GateError, SubmissionScope};
    use shared_bus::{EngineEvent, EventFilter, EventTopic};
    use shared_types::entities::{PartitionKey, U256};
    use tokio::time::timeout;

    /// Test: the full demo trade settles exactly the listed price to the seller.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_demo_trade() {
        let mut h = EngineHarness::new();
        h.spawn_worker();
        let cast = h.cast.clone();

        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        let key = PartitionKey::new(group, contract);

        h.private(
            &cast.seller,
            group,
            ContractCall::SetItem {
                contract,
                price: h.price(),
                name: SECRET_NAME.to_string(),
                description: "desc".to_string(),
            },
        )
        .await
        .unwrap();
        h.prepay(escrow, h.price()).await;
        assert_eq!(h.balance(escrow).await, h.price());

        let bought = h
            .private(
                &cast.buyer,
                group,
                ContractCall::Buy {
                    contract,
                    buyer_pub_key: "pubkeyB".to_string(),
                },
            )
            .await
            .unwrap();
        match bought.output {
            CallOutput::Order(Some(order)) => {
                assert_eq!(order.price, h.price());
                assert_eq!(order.buyer, cast.buyer.address());
                assert_eq!(order.seller, cast.seller.address());
            }
            other => panic!("unexpected buy output: {other:?}"),
        }
        let trade = h.container.trades.trade(&key, &cast.seller).unwrap();
        assert!(!trade.item.available);

        h.private(
            &cast.seller,
            group,
            ContractCall::Deliver {
                contract,
                content_id: "cid1".to_string(),
                symmetric_key_encrypted: "encKey".to_string(),
            },
        )
        .await
        .unwrap();

        let mut settlements = h.settlements();
        h.confirm(group, contract).await.unwrap();
        assert!(wait_settled(&mut settlements, contract, Duration::from_secs(5)).await);

        assert_eq!(h.balance(escrow).await, U256::zero());
        assert_eq!(
            h.credited(escrow, cast.seller.address()).await,
            h.price()
        );

        let status = h
            .private(&cast.buyer, group, ContractCall::Status { contract })
            .await
            .unwrap();
        match status.output {
            CallOutput::Status(status) => {
                assert_eq!(status.state, TradeState::Settled);
                assert!(matches!(status.settlement, SettlementStatus::Settled { .. }));
            }
            other => panic!("unexpected status output: {other:?}"),
        }

        let delivery = h
            .private(&cast.seller, group, ContractCall::Delivery { contract })
            .await
            .unwrap();
        assert!(matches!(
            delivery.output,
            CallOutput::Delivery(Some(ref d)) if d.confirmed
        ));

        let outsider = h
            .private(&cast.outsider, group, ContractCall::GetItemName { contract })
            .await;
        assert_eq!(outsider, Err(GateError::AccessDenied));
        assert_eq!(GateError::AccessDenied.to_string(), "not found");

        h.stop_worker().await;
    }

    /// Test: confirmation before funding fails, is recorded, and settles on re-drive.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_late_funding_settles_on_redrive() {
        let mut config = NodeConfig::default();
        config.settlement.redrive_interval_secs = 1;
        let mut h = EngineHarness::with_config(config);
        h.spawn_worker();
        let cast = h.cast.clone();

        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.advance_to_delivered(group, contract).await;

        let mut settlements = h.settlements();
        h.confirm(group, contract).await.unwrap();

        let failed = timeout(Duration::from_secs(2), async {
            loop {
                match settlements.recv().await {
                    Some(EngineEvent::SettlementFailed { key, attempts, .. })
                        if key.trade == contract =>
                    {
                        return attempts
                    }
                    Some(_) => continue,
                    None => return 0,
                }
            }
        })
        .await
        .unwrap();
        assert!(failed >= 1);

        // The failure is visible to members as a sub-state of Confirmed.
        let status = h
            .container
            .trades
            .status(&PartitionKey::new(group, contract), &cast.buyer)
            .unwrap();
        assert_eq!(status.state, TradeState::Confirmed);
        assert!(matches!(status.settlement, SettlementStatus::Failed { .. }));
        assert!(h
            .container
            .bridge
            .pending()
            .contains(&PartitionKey::new(group, contract)));

        h.prepay(escrow, h.price()).await;
        assert!(wait_settled(&mut settlements, contract, Duration::from_secs(5)).await);
        assert_eq!(
            h.credited(escrow, cast.seller.address()).await,
            h.price()
        );
        assert!(h.container.bridge.pending().is_empty());

        h.stop_worker().await;
    }

    /// Test: a confirmation made while no worker listens is settled once one starts.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_confirmation_before_worker_starts() {
        let mut h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price()).await;
        h.advance_to_delivered(group, contract).await;
        let key = PartitionKey::new(group, contract);

        // No worker yet: the trigger reaches nobody.
        h.confirm(group, contract).await.unwrap();
        assert_eq!(h.container.bridge.pending(), vec![key]);

        let mut settlements = h.settlements();
        h.spawn_worker();
        assert!(wait_settled(&mut settlements, contract, Duration::from_secs(5)).await);
        h.stop_worker().await;

        assert_eq!(h.credited(escrow, h.cast.seller.address()).await, h.price());
        assert_eq!(h.balance(escrow).await, U256::zero());
        assert!(h.container.bridge.pending().is_empty());
    }

    /// Test: the settlement payout reaches the ledger as the agent's public payTo.
    #[tokio::test]
    async fn test_e2e_settlement_payout_committed() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price()).await;
        h.advance_to_delivered(group, contract).await;
        h.confirm(group, contract).await.unwrap();
        let before = h.container.ledger.len();

        let outcome = h
            .container
            .bridge
            .on_confirmed(PartitionKey::new(group, contract))
            .await
            .unwrap();
        assert!(matches!(outcome, SettlementOutcome::Settled { .. }));

        let submissions = h.container.ledger.submissions();
        assert_eq!(submissions.len(), before + 1);
        let payout = &submissions[before];
        assert_eq!(payout.sender, h.cast.agent.address());
        let SubmissionScope::Public { payload } = &payout.scope else {
            panic!("settlement payout must be public");
        };
        let call: ContractCall = bincode::deserialize(payload).unwrap();
        let seller = h.cast.seller.address();
        let price = h.price();
        assert!(matches!(
            call,
            ContractCall::PayTo { escrow: e, to, amount } if e == escrow && to == seller && amount == price
        ));
    }

    /// Test: the runtime's nine-scene driver completes against a fresh engine.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_runtime_scenario() {
        let mut h = EngineHarness::new();
        h.spawn_worker();

        let reports = Scenario::new(h.container.clone(), h.cast.clone())
            .with_settle_timeout(Duration::from_secs(5))
            .run()
            .await
            .unwrap();

        let names: Vec<_> = reports.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "deploy trading contract",
                "deploy escrow",
                "list item",
                "prepay",
                "buy",
                "deliver",
                "confirm",
                "settle",
                "unauthorized inspect",
            ]
        );
        h.stop_worker().await;
    }

    /// Test: deployments are announced on the bus with ids only.
    #[tokio::test]
    async fn test_e2e_deployments_published() {
        let h = EngineHarness::new();
        let mut deployments = h
            .container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Deployment]));

        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;

        let first = timeout(Duration::from_millis(200), deployments.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            first,
            EngineEvent::TradingContractDeployed { key } if key == PartitionKey::new(group, contract)
        ));
        let second = timeout(Duration::from_millis(200), deployments.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            second,
            EngineEvent::EscrowDeployed { escrow: e, owner } if e == escrow && owner == h.cast.agent.address()
        ));
    }
}
