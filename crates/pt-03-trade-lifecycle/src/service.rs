//! # Trade Service
//!
//! Application service implementing `TradeLifecycleApi` on top of the
//! private state store.

use crate::domain::{
    Delivery, ItemView, Order, PrivateEvent, Trade, TradeError, TradeState, TradeStatus,
};
use crate::ports::TradeLifecycleApi;
use async_trait::async_trait;
use pt_02_private_state::PrivateStateStore;
use shared_bus::{EngineEvent, EventPublisher};
use parking_lot::Mutex;
use shared_types::entities::{Amount, Participant, PartitionKey, ReceiptId};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Trade lifecycle service.
pub struct TradeService {
    store: Arc<PrivateStateStore<Trade>>,
    bus: Arc<dyn EventPublisher>,
    settlement_agent: Participant,
    /// Confirmed and not yet settled.
    awaiting_settlement: Mutex<BTreeSet<PartitionKey>>,
}

impl TradeService {
    /// Create the service.
    ///
    /// `settlement_agent` is the only identity allowed to record settlement
    /// outcomes.
    pub fn new(
        store: Arc<PrivateStateStore<Trade>>,
        bus: Arc<dyn EventPublisher>,
        settlement_agent: Participant,
    ) -> Self {
        Self {
            store,
            bus,
            settlement_agent,
            awaiting_settlement: Mutex::new(BTreeSet::new()),
        }
    }

    fn read(&self, key: &PartitionKey, caller: &Participant) -> Result<Trade, TradeError> {
        Ok(self.store.get(key, caller)?.record)
    }

    /// Apply `f` to an existing trade.
    fn modify<T, F>(&self, key: &PartitionKey, caller: &Participant, f: F) -> Result<T, TradeError>
    where
        F: FnOnce(&mut Trade) -> Result<T, TradeError>,
    {
        let mut output = None;
        self.store.update(key, caller, |current| {
            let mut trade = current.ok_or(TradeError::AccessDenied)?;
            output = Some(f(&mut trade)?);
            Ok::<_, TradeError>(trade)
        })?;
        output.ok_or(TradeError::AccessDenied)
    }

    fn require_agent(&self, caller: &Participant) -> Result<(), TradeError> {
        if *caller != self.settlement_agent {
            return Err(TradeError::NotSettlementAgent);
        }
        Ok(())
    }
}

#[async_trait]
impl TradeLifecycleApi for TradeService {
    fn open(&self, key: &PartitionKey, caller: &Participant) -> Result<(), TradeError> {
        self.store.open(key, caller)?;
        Ok(())
    }

    fn set_item(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        price: Amount,
        name: String,
        description: String,
    ) -> Result<(), TradeError> {
        let seller = caller.address();
        self.store.update(key, caller, |current| match current {
            None => Trade::list(*key, seller, price, name, description),
            Some(mut trade) => {
                trade.relist(&seller, price, name, description)?;
                Ok(trade)
            }
        })?;
        info!("[pt-03] Item listed in trade {}", key.trade);
        Ok(())
    }

    fn update_item_price(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        price: Amount,
    ) -> Result<(), TradeError> {
        let seller = caller.address();
        self.modify(key, caller, |trade| trade.update_price(&seller, price))?;
        debug!("[pt-03] Price updated in trade {}", key.trade);
        Ok(())
    }

    fn buy(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        buyer_pub_key: String,
    ) -> Result<Order, TradeError> {
        let buyer = caller.address();
        let order = self.store.update(key, caller, |current| {
            let mut trade = current.ok_or(TradeError::ItemUnavailable)?;
            trade.buy(&buyer, buyer_pub_key)?;
            Ok::<_, TradeError>(trade)
        })?;
        info!("[pt-03] Order created in trade {}", key.trade);
        order.record.order.ok_or(TradeError::ItemUnavailable)
    }

    fn deliver(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        content_id: String,
        symmetric_key_encrypted: String,
    ) -> Result<Delivery, TradeError> {
        let seller = caller.address();
        let delivered = self.store.update(key, caller, |current| {
            let mut trade = current.ok_or(TradeError::InvalidState {
                state: TradeState::Listed,
                action: "deliver",
            })?;
            trade.deliver(&seller, content_id, symmetric_key_encrypted)?;
            Ok::<_, TradeError>(trade)
        })?;
        info!("[pt-03] Delivery recorded in trade {}", key.trade);
        delivered.record.delivery.ok_or(TradeError::InvalidState {
            state: delivered.record.state,
            action: "deliver",
        })
    }

    async fn confirm(&self, key: &PartitionKey, caller: &Participant) -> Result<(), TradeError> {
        let buyer = caller.address();
        self.store.update(key, caller, |current| {
            let mut trade = current.ok_or(TradeError::InvalidState {
                state: TradeState::Listed,
                action: "confirm",
            })?;
            trade.confirm(&buyer)?;
            Ok::<_, TradeError>(trade)
        })?;
        self.awaiting_settlement.lock().insert(*key);
        info!("[pt-03] Delivery confirmed in trade {}", key.trade);

        // The confirmed record is committed; settlement may start now.
        let receivers = self
            .bus
            .publish(EngineEvent::DeliveryConfirmed { key: *key })
            .await;
        if receivers == 0 {
            warn!(
                "[pt-03] No settlement listener for trade {}; left for re-drive",
                key.trade
            );
        }
        Ok(())
    }

    fn withdraw(&self, key: &PartitionKey, caller: &Participant) -> Result<(), TradeError> {
        let seller = caller.address();
        self.modify(key, caller, |trade| trade.withdraw(&seller))?;
        info!("[pt-03] Listing withdrawn in trade {}", key.trade);
        Ok(())
    }

    fn get_item(&self, key: &PartitionKey, caller: &Participant) -> Result<ItemView, TradeError> {
        Ok(self.read(key, caller)?.item_view())
    }

    fn get_item_name(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<String, TradeError> {
        Ok(self.read(key, caller)?.item.name)
    }

    fn get_item_price(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<Amount, TradeError> {
        Ok(self.read(key, caller)?.item.price)
    }

    fn order(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<Option<Order>, TradeError> {
        Ok(self.read(key, caller)?.order)
    }

    fn delivery(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<Option<Delivery>, TradeError> {
        Ok(self.read(key, caller)?.delivery)
    }

    fn status(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<TradeStatus, TradeError> {
        Ok(self.read(key, caller)?.status())
    }

    fn events(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<Vec<PrivateEvent>, TradeError> {
        Ok(self.read(key, caller)?.events)
    }

    fn trade(&self, key: &PartitionKey, caller: &Participant) -> Result<Trade, TradeError> {
        self.read(key, caller)
    }

    fn mark_settled(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        receipt: ReceiptId,
    ) -> Result<bool, TradeError> {
        // Membership is checked first so a non-member learns nothing.
        let current = self.read(key, caller)?;
        self.require_agent(caller)?;
        if current.state == TradeState::Settled {
            self.awaiting_settlement.lock().remove(key);
            return Ok(false);
        }

        let newly = self.modify(key, caller, |trade| trade.settle(receipt))?;
        self.awaiting_settlement.lock().remove(key);
        if newly {
            info!("[pt-03] Trade {} settled", key.trade);
        }
        Ok(newly)
    }

    fn record_settlement_failure(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        reason: String,
    ) -> Result<u32, TradeError> {
        self.read(key, caller)?;
        self.require_agent(caller)?;
        let attempts = self.modify(key, caller, |trade| trade.fail_settlement(reason))?;
        warn!(
            "[pt-03] Settlement attempt {} failed for trade {}",
            attempts, key.trade
        );
        Ok(attempts)
    }

    fn awaiting_settlement(&self, caller: &Participant) -> Result<Vec<PartitionKey>, TradeError> {
        self.require_agent(caller)?;
        Ok(self.awaiting_settlement.lock().iter().copied().collect())
    }
}
