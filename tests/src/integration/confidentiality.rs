//! # Confidentiality
//!
//! A caller outside the group learns nothing: every trading operation gives
//! the same "not found" a missing trade gives, and no private value reaches
//! the bus or the ledger.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::harness::{wait_settled, EngineHarness, SECRET_CID, SECRET_DESCRIPTION, SECRET_NAME};
    use node_runtime::container::NodeConfig;
    use pt_06_visibility_gate::{CallOutput, ContractCall, GateError, SubmissionScope};
    use shared_bus::{EngineEvent, EventFilter};
    use shared_types::entities::{GroupId, Participant, TradeId, U256};
    use tokio::time::timeout;

    fn every_trading_call(contract: TradeId) -> Vec<ContractCall> {
        vec![
            ContractCall::SetItem {
                contract,
                price: U256::from(1u64),
                name: "x".to_string(),
                description: "y".to_string(),
            },
            ContractCall::UpdateItemPrice {
                contract,
                price: U256::from(2u64),
            },
            ContractCall::Buy {
                contract,
                buyer_pub_key: "pk".to_string(),
            },
            ContractCall::Deliver {
                contract,
                content_id: "c".to_string(),
                symmetric_key_encrypted: "k".to_string(),
            },
            ContractCall::Confirm { contract },
            ContractCall::Withdraw { contract },
            ContractCall::GetItem { contract },
            ContractCall::GetItemName { contract },
            ContractCall::GetItemPrice { contract },
            ContractCall::Order { contract },
            ContractCall::Delivery { contract },
            ContractCall::Status { contract },
            ContractCall::Events { contract },
        ]
    }

    /// Test: outsider on a real trade, member on a missing trade, unknown group
    /// and unscoped calls all get the identical answer.
    #[tokio::test]
    async fn test_non_member_answer_indistinguishable_from_absent() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        h.advance_to_delivered(group, contract).await;
        let missing = TradeId([0x5A; 20]);
        let unknown_group = GroupId([0x5B; 32]);

        for call in every_trading_call(contract) {
            let name = call.name();
            let outsider = h.private(&h.cast.outsider, group, call.clone()).await;
            let unscoped = h.public(&h.cast.seller, call.clone()).await;
            let foreign_group = h.private(&h.cast.seller, unknown_group, call).await;
            assert_eq!(outsider, Err(GateError::AccessDenied), "{name}");
            assert_eq!(unscoped, Err(GateError::AccessDenied), "{name}");
            assert_eq!(foreign_group, Err(GateError::AccessDenied), "{name}");
        }
        // Writes included: a member writing to an absent trade is refused the
        // same way, and nothing springs into existence behind it.
        for call in every_trading_call(missing) {
            let name = call.name();
            let by_buyer = h.private(&h.cast.buyer, group, call.clone()).await;
            let by_seller = h.private(&h.cast.seller, group, call).await;
            assert_eq!(by_buyer, Err(GateError::AccessDenied), "{name}");
            assert_eq!(by_seller, Err(GateError::AccessDenied), "{name}");
        }
        let still_absent = h
            .private(&h.cast.seller, group, ContractCall::Status { contract: missing })
            .await;
        assert_eq!(still_absent, Err(GateError::AccessDenied));
        assert_eq!(GateError::AccessDenied.to_string(), "not found");
    }

    /// Test: members in a different group see nothing of this group's trade.
    #[tokio::test]
    async fn test_other_group_cannot_reach_trade() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        h.advance_to_delivered(group, contract).await;

        // D forms its own group with the agent and scopes calls to it.
        let outsider = h.cast.outsider.clone();
        let other_group = {
            let response = h
                .public(
                    &outsider,
                    ContractCall::DeployTradingContract {
                        participants: vec![outsider.clone(), h.cast.agent.clone()],
                    },
                )
                .await
                .unwrap();
            match response.output {
                CallOutput::Deployed { group: Some(g), .. } => g,
                other => panic!("unexpected output {other:?}"),
            }
        };
        assert_ne!(other_group, group);

        let result = h
            .private(&outsider, other_group, ContractCall::GetItemName { contract })
            .await;
        assert_eq!(result, Err(GateError::AccessDenied));
    }

    /// Test: no bus event carries a private field value.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_bus_carries_ids_only() {
        let mut h = EngineHarness::new();
        let mut everything = h.container.bus.subscribe(EventFilter::all());
        h.spawn_worker();

        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price()).await;
        h.advance_to_delivered(group, contract).await;
        let mut settlements = h.settlements();
        h.confirm(group, contract).await.unwrap();
        assert!(wait_settled(&mut settlements, contract, Duration::from_secs(5)).await);
        h.stop_worker().await;

        let buyer_key = h.cast.buyer.to_hex();
        let mut seen = 0;
        while let Ok(Some(event)) = everything.try_recv() {
            seen += 1;
            let encoded = serde_json::to_string(&event).unwrap();
            for secret in [SECRET_NAME, SECRET_DESCRIPTION, SECRET_CID, "encKey", buyer_key.as_str()] {
                assert!(!encoded.contains(secret), "{encoded} leaks {secret}");
            }
        }
        assert!(seen >= 6);
    }

    /// Test: a refused payout publishes its failure without the price.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_settlement_keeps_price_private() {
        let mut config = NodeConfig::default();
        config.settlement.max_attempts = 1;
        let mut h = EngineHarness::with_config(config);
        let mut everything = h.container.bus.subscribe(EventFilter::all());
        h.spawn_worker();

        // Escrow left empty, so the only attempt is refused and dead-lettered.
        let (group, contract) = h.deploy_trade().await;
        h.deploy_escrow().await;
        h.advance_to_delivered(group, contract).await;
        h.confirm(group, contract).await.unwrap();

        let price = h.price().to_string();
        let dead_lettered = timeout(Duration::from_secs(5), async {
            while let Some(event) = everything.recv().await {
                let encoded = serde_json::to_string(&event).unwrap();
                assert!(!encoded.contains(&price), "{encoded} leaks the price");
                if matches!(event, EngineEvent::CriticalError { key, .. } if key.trade == contract) {
                    return true;
                }
            }
            false
        });
        assert!(dead_lettered.await.unwrap());
        h.stop_worker().await;

        while let Ok(Some(event)) = everything.try_recv() {
            let encoded = serde_json::to_string(&event).unwrap();
            assert!(!encoded.contains(&price), "{encoded} leaks the price");
        }
    }

    /// Test: private calls reach the ledger as (group, digest) only.
    #[tokio::test]
    async fn test_ledger_sees_digests_for_private_calls() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price()).await;
        h.advance_to_delivered(group, contract).await;

        let submissions = h.container.ledger.submissions();
        let private = submissions
            .iter()
            .filter(|s| matches!(s.scope, SubmissionScope::Private { group: g, .. } if g == group))
            .count();
        // deploy + setItem + buy + deliver
        assert_eq!(private, 4);

        for submission in &submissions {
            if let SubmissionScope::Public { payload } = &submission.scope {
                for secret in [SECRET_NAME, SECRET_CID] {
                    let bytes = secret.as_bytes();
                    assert!(!payload.windows(bytes.len()).any(|w| w == bytes));
                }
            }
        }
    }

    /// Test: with private transactions disabled, nothing group-scoped runs.
    #[tokio::test]
    async fn test_private_tx_disabled_keeps_public_path() {
        let mut config = NodeConfig::default();
        config.gate.private_tx_enabled = false;
        let h = EngineHarness::with_config(config);

        let deploy = h
            .public(
                &h.cast.seller,
                ContractCall::DeployTradingContract {
                    participants: h.members(),
                },
            )
            .await;
        assert_eq!(deploy, Err(GateError::PrivateTxDisabled));

        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price()).await;
        assert_eq!(h.balance(escrow).await, h.price());
    }

    /// Test: a deployment must include the settling agent.
    #[tokio::test]
    async fn test_group_without_agent_rejected() {
        let h = EngineHarness::new();
        let stranger = Participant::new(vec![0xEE; 33]);
        let result = h
            .public(
                &h.cast.seller,
                ContractCall::DeployTradingContract {
                    participants: vec![h.cast.seller.clone(), stranger],
                },
            )
            .await;
        assert!(matches!(result, Err(GateError::InvalidGroup { .. })));
    }
}
