//! # Trade State Machine
//!
//! ```text
//! Listed ──buy──→ Ordered ──deliver──→ Delivered ──confirm──→ Confirmed ──payout──→ Settled
//!    └──withdraw──→ Void
//! ```
//!
//! Each transition is checked through the gate: who may take it, from which
//! state, and what a rejected attempt leaves behind.

#[cfg(test)]
mod tests {
    use crate::harness::{EngineHarness, SECRET_CID, SECRET_DESCRIPTION, SECRET_NAME};
    use pt_03_trade_lifecycle::{SettlementStatus, TradeLifecycleApi, TradeState};
    use pt_06_visibility_gate::{CallOutput, ContractCall, GateError};
    use shared_types::entities::{GroupId, PartitionKey, TradeId, U256};

    async fn list(h: &EngineHarness, group: GroupId, contract: TradeId) {
        h.private(
            &h.cast.seller,
            group,
            ContractCall::SetItem {
                contract,
                price: h.price(),
                name: SECRET_NAME.to_string(),
                description: SECRET_DESCRIPTION.to_string(),
            },
        )
        .await
        .unwrap();
    }

    async fn buy(
        h: &EngineHarness,
        group: GroupId,
        contract: TradeId,
    ) -> Result<(), GateError> {
        h.private(
            &h.cast.buyer,
            group,
            ContractCall::Buy {
                contract,
                buyer_pub_key: "pubkeyB".to_string(),
            },
        )
        .await
        .map(|_| ())
    }

    async fn deliver(
        h: &EngineHarness,
        group: GroupId,
        contract: TradeId,
    ) -> Result<(), GateError> {
        h.private(
            &h.cast.seller,
            group,
            ContractCall::Deliver {
                contract,
                content_id: SECRET_CID.to_string(),
                symmetric_key_encrypted: "encKey".to_string(),
            },
        )
        .await
        .map(|_| ())
    }

    fn state(h: &EngineHarness, group: GroupId, contract: TradeId) -> TradeState {
        h.container
            .trades
            .status(&PartitionKey::new(group, contract), &h.cast.seller)
            .unwrap()
            .state
    }

    /// Test: the item can be bought once; the second buyer finds it unavailable.
    #[tokio::test]
    async fn test_second_buy_rejected() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        list(&h, group, contract).await;

        buy(&h, group, contract).await.unwrap();
        assert_eq!(buy(&h, group, contract).await, Err(GateError::ItemUnavailable));

        let order = h
            .private(&h.cast.seller, group, ContractCall::Order { contract })
            .await
            .unwrap();
        match order.output {
            CallOutput::Order(Some(order)) => {
                assert_eq!(order.buyer, h.cast.buyer.address());
                assert_eq!(order.buyer_pub_key, "pubkeyB");
            }
            other => panic!("unexpected order output: {other:?}"),
        }
    }

    /// Test: transitions out of order leave the state unchanged.
    #[tokio::test]
    async fn test_out_of_order_transitions_rejected() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        list(&h, group, contract).await;

        assert!(matches!(
            deliver(&h, group, contract).await,
            Err(GateError::InvalidState {
                state: TradeState::Listed,
                ..
            })
        ));
        assert!(matches!(
            h.confirm(group, contract).await,
            Err(GateError::InvalidState { .. })
        ));
        assert_eq!(state(&h, group, contract), TradeState::Listed);

        buy(&h, group, contract).await.unwrap();
        assert!(matches!(
            h.confirm(group, contract).await,
            Err(GateError::InvalidState {
                state: TradeState::Ordered,
                ..
            })
        ));
        assert_eq!(state(&h, group, contract), TradeState::Ordered);

        deliver(&h, group, contract).await.unwrap();
        assert!(matches!(
            deliver(&h, group, contract).await,
            Err(GateError::InvalidState {
                state: TradeState::Delivered,
                ..
            })
        ));
        assert_eq!(state(&h, group, contract), TradeState::Delivered);
    }

    /// Test: seller-only and buyer-only actions reject the other members.
    #[tokio::test]
    async fn test_role_checks() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        list(&h, group, contract).await;

        let reprice = h
            .private(
                &h.cast.buyer,
                group,
                ContractCall::UpdateItemPrice {
                    contract,
                    price: U256::from(1u64),
                },
            )
            .await;
        assert_eq!(reprice, Err(GateError::NotSeller));

        buy(&h, group, contract).await.unwrap();

        let foreign_delivery = h
            .private(
                &h.cast.agent,
                group,
                ContractCall::Deliver {
                    contract,
                    content_id: "c".to_string(),
                    symmetric_key_encrypted: "k".to_string(),
                },
            )
            .await;
        assert_eq!(foreign_delivery, Err(GateError::NotSeller));

        deliver(&h, group, contract).await.unwrap();

        let seller_confirm = h
            .private(&h.cast.seller, group, ContractCall::Confirm { contract })
            .await;
        assert_eq!(seller_confirm, Err(GateError::NotBuyer));
        assert_eq!(state(&h, group, contract), TradeState::Delivered);
    }

    /// Test: a second confirmation fails and changes nothing.
    #[tokio::test]
    async fn test_double_confirm_rejected() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        h.advance_to_delivered(group, contract).await;

        h.confirm(group, contract).await.unwrap();
        let before = h
            .container
            .trades
            .trade(&PartitionKey::new(group, contract), &h.cast.buyer)
            .unwrap();

        assert_eq!(
            h.confirm(group, contract).await,
            Err(GateError::AlreadyConfirmed)
        );
        let after = h
            .container
            .trades
            .trade(&PartitionKey::new(group, contract), &h.cast.buyer)
            .unwrap();
        assert_eq!(before.state, TradeState::Confirmed);
        assert_eq!(after.state, TradeState::Confirmed);
        assert_eq!(before.events.len(), after.events.len());
        assert_eq!(after.settlement, SettlementStatus::Pending);
    }

    /// Test: the seller may withdraw before any order; the trade is then void.
    #[tokio::test]
    async fn test_withdraw_voids_listing() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        list(&h, group, contract).await;

        let by_buyer = h
            .private(&h.cast.buyer, group, ContractCall::Withdraw { contract })
            .await;
        assert_eq!(by_buyer, Err(GateError::NotSeller));

        h.private(&h.cast.seller, group, ContractCall::Withdraw { contract })
            .await
            .unwrap();
        assert_eq!(state(&h, group, contract), TradeState::Void);
        assert_eq!(buy(&h, group, contract).await, Err(GateError::ItemUnavailable));
    }

    /// Test: an ordered item can no longer be withdrawn or repriced.
    #[tokio::test]
    async fn test_ordered_item_is_fixed() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        list(&h, group, contract).await;
        buy(&h, group, contract).await.unwrap();

        let withdraw = h
            .private(&h.cast.seller, group, ContractCall::Withdraw { contract })
            .await;
        assert!(matches!(withdraw, Err(GateError::InvalidState { .. })));

        let reprice = h
            .private(
                &h.cast.seller,
                group,
                ContractCall::UpdateItemPrice {
                    contract,
                    price: U256::from(5u64),
                },
            )
            .await;
        assert_eq!(reprice, Err(GateError::ItemUnavailable));

        let price = h
            .private(&h.cast.buyer, group, ContractCall::GetItemPrice { contract })
            .await
            .unwrap();
        assert!(matches!(price.output, CallOutput::Price(p) if p == h.price()));
    }

    /// Test: listings need a non-zero price.
    #[tokio::test]
    async fn test_zero_price_rejected() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        let result = h
            .private(
                &h.cast.seller,
                group,
                ContractCall::SetItem {
                    contract,
                    price: U256::zero(),
                    name: "n".to_string(),
                    description: "d".to_string(),
                },
            )
            .await;
        assert_eq!(result, Err(GateError::ZeroPrice));
    }

    /// Test: members read back the listing they share.
    #[tokio::test]
    async fn test_members_read_listing() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        list(&h, group, contract).await;

        for member in h.members() {
            let item = h
                .private(&member, group, ContractCall::GetItem { contract })
                .await
                .unwrap();
            assert!(item.receipt.is_none());
            match item.output {
                CallOutput::Item(view) => {
                    assert_eq!(view.name, SECRET_NAME);
                    assert_eq!(view.description, SECRET_DESCRIPTION);
                    assert_eq!(view.price, h.price());
                }
                other => panic!("unexpected item output: {other:?}"),
            }
        }
    }
}
