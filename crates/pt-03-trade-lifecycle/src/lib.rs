//! # PT-03 Trade Lifecycle
//!
//! The private trading contract: one item, at most one order, one delivery,
//! one confirmation, all stored inside the owning group's partition.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (DDD + Ports)
//!
//! ## State Machine
//!
//! ```text
//!  setItem        buy           deliver        confirm        (bridge)
//! ────────► Listed ────► Ordered ───────► Delivered ───────► Confirmed ───────► Settled
//!             │                                                 │
//!             │ withdraw                                        └─ settlement: Pending | Failed{attempts}
//!             ▼
//!            Void
//! ```
//!
//! ## Confidentiality
//!
//! Every operation goes through the private state store with the caller's
//! identity. A caller outside the group, or asking about a trade that does
//! not exist, gets `AccessDenied`, which displays as "not found".
//!
//! `DeliveryConfirmed` is published on the bus only after the confirmed
//! record is committed, and carries the partition key only.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    Delivery, Item, ItemView, Order, PrivateEvent, SettlementStatus, Trade, TradeError,
    TradeState, TradeStatus,
};
pub use ports::TradeLifecycleApi;
pub use service::TradeService;
