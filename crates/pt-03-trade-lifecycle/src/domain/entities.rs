//! # Domain Entities
//!
//! The trade aggregate and the records it owns. All of it lives sealed in
//! one private partition; nothing here is ever published.

use super::errors::TradeError;
use super::invariants::{invariant_buyer, invariant_seller, invariant_transition};
use super::value_objects::{SettlementStatus, TradeState};
use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, Amount, GroupId, PartitionKey, ReceiptId, TradeId};

/// The item for sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// `true` until bought or withdrawn.
    pub available: bool,
    /// Item name.
    pub name: String,
    /// Price in the smallest currency unit.
    pub price: Amount,
    /// Free-form description.
    pub description: String,
    /// Seller account.
    pub seller: Address,
}

/// The single order placed against the item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Set when the order is created.
    pub available: bool,
    /// Price at the moment of purchase.
    pub price: Amount,
    /// Seller account.
    pub seller: Address,
    /// Buyer account.
    pub buyer: Address,
    /// Public key the seller encrypts the content key with.
    pub buyer_pub_key: String,
}

/// The seller's delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Set when the delivery is created.
    pub available: bool,
    /// Content identifier of the delivered data.
    pub content_id: String,
    /// Symmetric key encrypted to the buyer's public key.
    pub symmetric_key_encrypted: String,
    /// Flipped once, by the buyer.
    pub confirmed: bool,
}

/// Events kept in the partition's own log. Members only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateEvent {
    /// Item listed or its terms replaced.
    ItemListed {
        /// Listed price.
        price: Amount,
    },
    /// Seller changed the price.
    PriceUpdated {
        /// New price.
        price: Amount,
    },
    /// Buyer placed the order.
    OrderCreated {
        /// Agreed price.
        price: Amount,
        /// Seller account.
        seller: Address,
        /// Buyer account.
        buyer: Address,
        /// Buyer public key.
        buyer_pub_key: String,
    },
    /// Seller delivered.
    ItemDelivered {
        /// Content identifier.
        content_id: String,
        /// Seller account.
        seller: Address,
        /// Buyer account.
        buyer: Address,
        /// Encrypted content key.
        symmetric_key_encrypted: String,
    },
    /// Buyer confirmed the delivery.
    Confirmed {
        /// Seller account.
        seller: Address,
        /// Buyer account.
        buyer: Address,
    },
    /// Payout completed.
    Settled {
        /// Escrow payout receipt.
        receipt: ReceiptId,
    },
    /// A payout attempt failed.
    SettlementFailed {
        /// Attempt number.
        attempts: u32,
        /// Failure reason.
        reason: String,
    },
    /// Seller withdrew the listing.
    Withdrawn,
}

/// `getItem()` result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    /// Item name.
    pub name: String,
    /// Current price.
    pub price: Amount,
    /// Description.
    pub description: String,
}

/// `status()` result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStatus {
    /// Lifecycle state.
    pub state: TradeState,
    /// Settlement progress.
    pub settlement: SettlementStatus,
}

/// The trade aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Trading contract address.
    pub id: TradeId,
    /// Owning privacy group.
    pub group: GroupId,
    /// Item for sale.
    pub item: Item,
    /// Order, once bought.
    pub order: Option<Order>,
    /// Delivery, once delivered.
    pub delivery: Option<Delivery>,
    /// Lifecycle state.
    pub state: TradeState,
    /// Settlement progress.
    pub settlement: SettlementStatus,
    /// Private event log.
    pub events: Vec<PrivateEvent>,
}

impl Trade {
    /// Create a listing in an empty partition.
    pub fn list(
        key: PartitionKey,
        seller: Address,
        price: Amount,
        name: String,
        description: String,
    ) -> Result<Self, TradeError> {
        if price.is_zero() {
            return Err(TradeError::ZeroPrice);
        }
        Ok(Self {
            id: key.trade,
            group: key.group,
            item: Item {
                available: true,
                name,
                price,
                description,
                seller,
            },
            order: None,
            delivery: None,
            state: TradeState::Listed,
            settlement: SettlementStatus::NotDue,
            events: vec![PrivateEvent::ItemListed { price }],
        })
    }

    /// Partition key of this trade.
    pub fn key(&self) -> PartitionKey {
        PartitionKey::new(self.group, self.id)
    }

    /// Replace the listing terms. Seller only, while still listed.
    pub fn relist(
        &mut self,
        caller: &Address,
        price: Amount,
        name: String,
        description: String,
    ) -> Result<(), TradeError> {
        if self.state != TradeState::Listed {
            return Err(TradeError::InvalidState {
                state: self.state,
                action: "set item",
            });
        }
        invariant_seller(&self.item, caller)?;
        if price.is_zero() {
            return Err(TradeError::ZeroPrice);
        }
        self.item.price = price;
        self.item.name = name;
        self.item.description = description;
        self.events.push(PrivateEvent::ItemListed { price });
        Ok(())
    }

    /// Change the price. Seller only, while the item is available.
    pub fn update_price(&mut self, caller: &Address, price: Amount) -> Result<(), TradeError> {
        invariant_seller(&self.item, caller)?;
        if !self.item.available {
            return Err(TradeError::ItemUnavailable);
        }
        if price.is_zero() {
            return Err(TradeError::ZeroPrice);
        }
        self.item.price = price;
        self.events.push(PrivateEvent::PriceUpdated { price });
        Ok(())
    }

    /// Place the order. The item must still be available.
    pub fn buy(&mut self, buyer: &Address, buyer_pub_key: String) -> Result<(), TradeError> {
        if self.state != TradeState::Listed || !self.item.available {
            return Err(TradeError::ItemUnavailable);
        }
        invariant_transition(self.state, TradeState::Ordered, "buy")?;

        let order = Order {
            available: true,
            price: self.item.price,
            seller: self.item.seller,
            buyer: *buyer,
            buyer_pub_key: buyer_pub_key.clone(),
        };
        self.item.available = false;
        self.events.push(PrivateEvent::OrderCreated {
            price: order.price,
            seller: order.seller,
            buyer: order.buyer,
            buyer_pub_key,
        });
        self.order = Some(order);
        self.state = TradeState::Ordered;
        Ok(())
    }

    /// Deliver the content reference. Seller only, after the order.
    pub fn deliver(
        &mut self,
        caller: &Address,
        content_id: String,
        symmetric_key_encrypted: String,
    ) -> Result<(), TradeError> {
        invariant_seller(&self.item, caller)?;
        invariant_transition(self.state, TradeState::Delivered, "deliver")?;
        let buyer = self
            .order
            .as_ref()
            .map(|o| o.buyer)
            .ok_or(TradeError::InvalidState {
                state: self.state,
                action: "deliver",
            })?;

        self.events.push(PrivateEvent::ItemDelivered {
            content_id: content_id.clone(),
            seller: self.item.seller,
            buyer,
            symmetric_key_encrypted: symmetric_key_encrypted.clone(),
        });
        self.delivery = Some(Delivery {
            available: true,
            content_id,
            symmetric_key_encrypted,
            confirmed: false,
        });
        self.state = TradeState::Delivered;
        Ok(())
    }

    /// Confirm the delivery. Buyer only, exactly once.
    pub fn confirm(&mut self, caller: &Address) -> Result<(), TradeError> {
        let not_yet = TradeError::InvalidState {
            state: self.state,
            action: "confirm",
        };
        let order = self.order.as_ref().ok_or_else(|| not_yet.clone())?;
        invariant_buyer(order, caller)?;
        let buyer = order.buyer;

        let delivery = self.delivery.as_ref().ok_or(not_yet)?;
        if delivery.confirmed {
            return Err(TradeError::AlreadyConfirmed);
        }
        invariant_transition(self.state, TradeState::Confirmed, "confirm")?;

        if let Some(delivery) = self.delivery.as_mut() {
            delivery.confirmed = true;
        }
        self.state = TradeState::Confirmed;
        self.settlement = SettlementStatus::Pending;
        self.events.push(PrivateEvent::Confirmed {
            seller: self.item.seller,
            buyer,
        });
        Ok(())
    }

    /// Withdraw an unsold listing. Seller only.
    pub fn withdraw(&mut self, caller: &Address) -> Result<(), TradeError> {
        invariant_seller(&self.item, caller)?;
        invariant_transition(self.state, TradeState::Void, "withdraw")?;
        self.item.available = false;
        self.state = TradeState::Void;
        self.events.push(PrivateEvent::Withdrawn);
        Ok(())
    }

    /// Record the payout. Returns `false` if the trade was already settled.
    pub fn settle(&mut self, receipt: ReceiptId) -> Result<bool, TradeError> {
        if self.state == TradeState::Settled {
            return Ok(false);
        }
        invariant_transition(self.state, TradeState::Settled, "settle")?;
        self.state = TradeState::Settled;
        self.settlement = SettlementStatus::Settled { receipt };
        self.events.push(PrivateEvent::Settled { receipt });
        Ok(true)
    }

    /// Record a failed payout attempt. Returns the attempt count.
    pub fn fail_settlement(&mut self, reason: String) -> Result<u32, TradeError> {
        if self.state != TradeState::Confirmed {
            return Err(TradeError::InvalidState {
                state: self.state,
                action: "record settlement failure",
            });
        }
        let attempts = self.settlement.attempts() + 1;
        self.events.push(PrivateEvent::SettlementFailed {
            attempts,
            reason: reason.clone(),
        });
        self.settlement = SettlementStatus::Failed { attempts, reason };
        Ok(attempts)
    }

    /// `getItem()` view.
    pub fn item_view(&self) -> ItemView {
        ItemView {
            name: self.item.name.clone(),
            price: self.item.price,
            description: self.item.description.clone(),
        }
    }

    /// `status()` view.
    pub fn status(&self) -> TradeStatus {
        TradeStatus {
            state: self.state,
            settlement: self.settlement.clone(),
        }
    }
}
