//! # Inbound Ports
//!
//! API trait of the private trading contract. Every method takes the
//! partition key and the caller; the caller must be a group member.

use crate::domain::{Delivery, ItemView, Order, PrivateEvent, Trade, TradeError, TradeStatus};
use async_trait::async_trait;
use shared_types::entities::{Amount, Participant, PartitionKey, ReceiptId};

/// Trade lifecycle API - inbound port.
#[async_trait]
pub trait TradeLifecycleApi: Send + Sync {
    /// Open the empty partition of a freshly deployed trading contract.
    fn open(&self, key: &PartitionKey, caller: &Participant) -> Result<(), TradeError>;

    /// `setItem(price, name, description)`.
    fn set_item(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        price: Amount,
        name: String,
        description: String,
    ) -> Result<(), TradeError>;

    /// `updateItemPrice(price)`.
    fn update_item_price(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        price: Amount,
    ) -> Result<(), TradeError>;

    /// `buy(pubkey)`.
    fn buy(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        buyer_pub_key: String,
    ) -> Result<Order, TradeError>;

    /// `deliver(cid, symKey)`.
    fn deliver(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        content_id: String,
        symmetric_key_encrypted: String,
    ) -> Result<Delivery, TradeError>;

    /// `confirm()`. Publishes `DeliveryConfirmed` after the commit.
    async fn confirm(&self, key: &PartitionKey, caller: &Participant) -> Result<(), TradeError>;

    /// Seller withdraws an unsold listing.
    fn withdraw(&self, key: &PartitionKey, caller: &Participant) -> Result<(), TradeError>;

    /// `getItem()`.
    fn get_item(&self, key: &PartitionKey, caller: &Participant) -> Result<ItemView, TradeError>;

    /// `getItemName()`.
    fn get_item_name(&self, key: &PartitionKey, caller: &Participant)
        -> Result<String, TradeError>;

    /// `getItemPrice()`.
    fn get_item_price(&self, key: &PartitionKey, caller: &Participant)
        -> Result<Amount, TradeError>;

    /// `_order()`.
    fn order(&self, key: &PartitionKey, caller: &Participant)
        -> Result<Option<Order>, TradeError>;

    /// `_delivery()`.
    fn delivery(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<Option<Delivery>, TradeError>;

    /// Lifecycle state and settlement progress.
    fn status(&self, key: &PartitionKey, caller: &Participant)
        -> Result<TradeStatus, TradeError>;

    /// Private event log.
    fn events(
        &self,
        key: &PartitionKey,
        caller: &Participant,
    ) -> Result<Vec<PrivateEvent>, TradeError>;

    /// Full record snapshot.
    fn trade(&self, key: &PartitionKey, caller: &Participant) -> Result<Trade, TradeError>;

    /// `Confirmed → Settled`. Settlement agent only; `Ok(false)` if already settled.
    fn mark_settled(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        receipt: ReceiptId,
    ) -> Result<bool, TradeError>;

    /// Record a failed payout attempt. Settlement agent only.
    fn record_settlement_failure(
        &self,
        key: &PartitionKey,
        caller: &Participant,
        reason: String,
    ) -> Result<u32, TradeError>;

    /// Confirmed trades not yet settled, in key order. Settlement agent only.
    ///
    /// A trade joins this set when its confirmation is stored and leaves it
    /// once settled, regardless of whether the confirmation event was seen.
    fn awaiting_settlement(&self, caller: &Participant) -> Result<Vec<PartitionKey>, TradeError>;
}
