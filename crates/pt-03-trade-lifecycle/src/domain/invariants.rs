//! # Domain Invariants
//!
//! Caller and ordering rules shared by every trade transition.

use super::entities::{Item, Order};
use super::errors::TradeError;
use super::value_objects::TradeState;
use shared_types::entities::Address;

/// Invariant: only the seller may act on the listing or deliver.
pub fn invariant_seller(item: &Item, caller: &Address) -> Result<(), TradeError> {
    if item.seller != *caller {
        return Err(TradeError::NotSeller);
    }
    Ok(())
}

/// Invariant: only the buyer may confirm.
pub fn invariant_buyer(order: &Order, caller: &Address) -> Result<(), TradeError> {
    if order.buyer != *caller {
        return Err(TradeError::NotBuyer);
    }
    Ok(())
}

/// Invariant: lifecycle only moves along allowed edges.
pub fn invariant_transition(
    from: TradeState,
    to: TradeState,
    action: &'static str,
) -> Result<(), TradeError> {
    if !from.can_transition_to(to) {
        return Err(TradeError::InvalidState {
            state: from,
            action,
        });
    }
    Ok(())
}
