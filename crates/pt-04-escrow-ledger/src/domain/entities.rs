//! # Domain Entities

use super::errors::EscrowError;
use super::invariants::{invariant_owner, invariant_sufficient_balance, invariant_target};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::entities::{Address, Amount, Hash, ReceiptId};
use std::collections::HashMap;

/// Record of one payout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutReceipt {
    /// Receipt id.
    pub receipt: ReceiptId,
    /// Paying escrow.
    pub escrow: Address,
    /// Target.
    pub to: Address,
    /// Paid value.
    pub amount: Amount,
    /// Settlement reference, if any.
    pub reference: Option<Hash>,
    /// Escrow balance right after the payout.
    pub balance_after: Amount,
}

/// Result of a referenced payout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payout {
    /// Funds moved now.
    Paid(PayoutReceipt),
    /// The reference was paid earlier; nothing moved.
    AlreadyPaid(PayoutReceipt),
}

impl Payout {
    /// The receipt, fresh or replayed.
    pub fn receipt(&self) -> &PayoutReceipt {
        match self {
            Self::Paid(r) | Self::AlreadyPaid(r) => r,
        }
    }
}

/// State of one escrow contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowAccount {
    /// Contract address.
    pub address: Address,
    /// Deployer, the only account allowed to pay out.
    pub owner: Address,
    /// Current balance.
    pub balance: Amount,
    /// Total paid to each target.
    pub credited: HashMap<Address, Amount>,
    /// Referenced payouts already made.
    pub paid_references: HashMap<Hash, PayoutReceipt>,
    /// Number of payouts made.
    pub payouts: u64,
}

impl EscrowAccount {
    /// A new, empty escrow.
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            balance: Amount::zero(),
            credited: HashMap::new(),
            paid_references: HashMap::new(),
            payouts: 0,
        }
    }

    /// Credit a deposit. Returns the new balance.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, EscrowError> {
        if amount.is_zero() {
            return Err(EscrowError::ZeroAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        Ok(self.balance)
    }

    /// Pay `amount` to `to`. All checks happen before any field changes.
    pub fn pay(
        &mut self,
        caller: &Address,
        to: Address,
        amount: Amount,
        reference: Option<Hash>,
    ) -> Result<Payout, EscrowError> {
        invariant_owner(&self.owner, caller)?;
        invariant_target(&to)?;

        if let Some(existing) = reference.and_then(|r| self.paid_references.get(&r)) {
            if existing.to != to || existing.amount != amount {
                return Err(EscrowError::ReferenceConflict);
            }
            return Ok(Payout::AlreadyPaid(existing.clone()));
        }

        let remaining = invariant_sufficient_balance(self.balance, amount)?;
        let credited = self
            .credited
            .get(&to)
            .copied()
            .unwrap_or_default()
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;

        let receipt = PayoutReceipt {
            receipt: self.receipt_id(&to, amount),
            escrow: self.address,
            to,
            amount,
            reference,
            balance_after: remaining,
        };
        self.balance = remaining;
        self.credited.insert(to, credited);
        self.payouts += 1;
        if let Some(r) = reference {
            self.paid_references.insert(r, receipt.clone());
        }
        Ok(Payout::Paid(receipt))
    }

    fn receipt_id(&self, to: &Address, amount: Amount) -> ReceiptId {
        let mut hasher = Sha256::new();
        hasher.update(self.address);
        hasher.update(to);
        let mut amount_bytes = [0u8; 32];
        amount.to_big_endian(&mut amount_bytes);
        hasher.update(amount_bytes);
        hasher.update(self.payouts.to_be_bytes());
        ReceiptId(hasher.finalize().into())
    }
}
