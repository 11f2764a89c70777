//! # Domain Invariants

use super::errors::EscrowError;
use shared_types::entities::{Address, Amount, ZERO_ADDRESS};

/// Invariant: only the owner pays out.
pub fn invariant_owner(owner: &Address, caller: &Address) -> Result<(), EscrowError> {
    if owner != caller {
        return Err(EscrowError::Unauthorized);
    }
    Ok(())
}

/// Invariant: payouts never go to the zero address.
pub fn invariant_target(to: &Address) -> Result<(), EscrowError> {
    if *to == ZERO_ADDRESS {
        return Err(EscrowError::InvalidTarget);
    }
    Ok(())
}

/// Invariant: balance never goes negative. Returns the remaining balance.
pub fn invariant_sufficient_balance(
    balance: Amount,
    requested: Amount,
) -> Result<Amount, EscrowError> {
    balance
        .checked_sub(requested)
        .ok_or(EscrowError::InsufficientFunds {
            requested,
            available: balance,
        })
}
