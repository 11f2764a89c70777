//! # Settlement Idempotence
//!
//! However often a confirmation is delivered (repeated trigger, concurrent
//! triggers, worker plus a manual call, or a payout replay with the same
//! reference) the seller is paid exactly once.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::harness::{wait_settled, EngineHarness};
    use futures::future::join_all;
    use pt_03_trade_lifecycle::{TradeLifecycleApi, TradeState};
    use pt_04_escrow_ledger::{EscrowLedgerApi, Payout};
    use pt_05_settlement_bridge::{settlement_reference, SettlementBridgeApi, SettlementOutcome};
    use shared_bus::{EngineEvent, EventFilter, EventTopic};
    use shared_types::entities::{Address, PartitionKey, U256};

    /// Confirmed trade over a funded escrow (twice the price), no worker running.
    async fn confirmed_trade(h: &EngineHarness) -> (PartitionKey, Address) {
        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price() * U256::from(2u64)).await;
        h.advance_to_delivered(group, contract).await;
        h.confirm(group, contract).await.unwrap();
        (PartitionKey::new(group, contract), escrow)
    }

    async fn assert_paid_once(h: &EngineHarness, escrow: Address) {
        assert_eq!(h.credited(escrow, h.cast.seller.address()).await, h.price());
        assert_eq!(h.balance(escrow).await, h.price());
    }

    /// Test: a repeated trigger settles once and then reports nothing to do.
    #[tokio::test]
    async fn test_repeated_trigger_pays_once() {
        let h = EngineHarness::new();
        let (key, escrow) = confirmed_trade(&h).await;

        let first = h.container.bridge.on_confirmed(key).await.unwrap();
        let second = h.container.bridge.on_confirmed(key).await.unwrap();
        assert!(matches!(first, SettlementOutcome::Settled { .. }));
        assert_eq!(second, SettlementOutcome::AlreadySettled);

        assert_paid_once(&h, escrow).await;
        let status = h.container.trades.status(&key, &h.cast.seller).unwrap();
        assert_eq!(status.state, TradeState::Settled);
    }

    /// Test: many concurrent triggers for one trade produce one payout.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_triggers_pay_once() {
        let h = EngineHarness::new();
        let (key, escrow) = confirmed_trade(&h).await;

        let handles: Vec<_> = (0..24)
            .map(|_| {
                let bridge = Arc::clone(&h.container.bridge);
                tokio::spawn(async move { bridge.on_confirmed(key).await })
            })
            .collect();
        let outcomes: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        let settled = outcomes
            .iter()
            .filter(|o| matches!(o, SettlementOutcome::Settled { .. }))
            .count();
        assert_eq!(settled, 1);
        assert!(outcomes.iter().all(|o| matches!(
            o,
            SettlementOutcome::Settled { .. }
                | SettlementOutcome::AlreadySettled
                | SettlementOutcome::InProgress
        )));

        assert_paid_once(&h, escrow).await;
    }

    /// Test: the worker and a manual trigger racing on the same trade pay once.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_worker_and_manual_trigger_pay_once() {
        let mut h = EngineHarness::new();
        let mut releases = h
            .container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Escrow]));
        h.spawn_worker();

        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price() * U256::from(2u64)).await;
        h.advance_to_delivered(group, contract).await;

        let mut settlements = h.settlements();
        h.confirm(group, contract).await.unwrap();
        let manual = h
            .container
            .bridge
            .on_confirmed(PartitionKey::new(group, contract))
            .await
            .unwrap();
        assert!(!matches!(manual, SettlementOutcome::Failed { .. }));

        assert!(wait_settled(&mut settlements, contract, Duration::from_secs(5)).await);
        // Let any late duplicate run to completion.
        tokio::time::sleep(Duration::from_millis(100)).await;
        h.stop_worker().await;

        let mut released = 0;
        while let Ok(Some(event)) = releases.try_recv() {
            if matches!(event, EngineEvent::FundsReleased { .. }) {
                released += 1;
            }
        }
        assert_eq!(released, 1);
        assert_paid_once(&h, escrow).await;
    }

    /// Test: replaying the settlement reference directly on the escrow moves nothing.
    #[tokio::test]
    async fn test_reference_replay_moves_nothing() {
        let h = EngineHarness::new();
        let (key, escrow) = confirmed_trade(&h).await;
        h.container.bridge.on_confirmed(key).await.unwrap();

        let replay = h
            .container
            .escrows
            .pay_to_with_reference(
                escrow,
                h.cast.agent.address(),
                h.cast.seller.address(),
                h.price(),
                settlement_reference(&key),
            )
            .await
            .unwrap();
        assert!(matches!(replay, Payout::AlreadyPaid(_)));
        assert_paid_once(&h, escrow).await;
    }

    /// Test: a trade that is not confirmed is never paid.
    #[tokio::test]
    async fn test_unconfirmed_trade_not_paid() {
        let h = EngineHarness::new();
        let (group, contract) = h.deploy_trade().await;
        let escrow = h.deploy_escrow().await;
        h.prepay(escrow, h.price()).await;
        h.advance_to_delivered(group, contract).await;

        let result = h
            .container
            .bridge
            .on_confirmed(PartitionKey::new(group, contract))
            .await;
        assert!(result.is_err());
        assert_eq!(h.balance(escrow).await, h.price());
        assert_eq!(
            h.credited(escrow, h.cast.seller.address()).await,
            U256::zero()
        );
    }
}
