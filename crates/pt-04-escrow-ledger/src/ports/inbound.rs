//! # Inbound Ports

use crate::domain::{EscrowError, Payout, PayoutReceipt};
use async_trait::async_trait;
use shared_types::entities::{Address, Amount, Hash};

/// Escrow ledger API - inbound port.
///
/// Escrows are public: reads need no authorization.
#[async_trait]
pub trait EscrowLedgerApi: Send + Sync {
    /// Register a new escrow at `escrow`, owned by `owner`.
    fn deploy(&self, escrow: Address, owner: Address) -> Result<(), EscrowError>;

    /// `prepay()`: credit `amount` from `from`. Returns the new balance.
    async fn prepay(
        &self,
        escrow: Address,
        from: Address,
        amount: Amount,
    ) -> Result<Amount, EscrowError>;

    /// `payTo(to, value)`: owner only.
    async fn pay_to(
        &self,
        escrow: Address,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<PayoutReceipt, EscrowError>;

    /// `payTo` carrying a settlement reference; a repeated reference pays nothing.
    async fn pay_to_with_reference(
        &self,
        escrow: Address,
        caller: Address,
        to: Address,
        amount: Amount,
        reference: Hash,
    ) -> Result<Payout, EscrowError>;

    /// `getBalance()`.
    fn get_balance(&self, escrow: Address) -> Result<Amount, EscrowError>;

    /// Total ever paid from `escrow` to `to`.
    fn credited(&self, escrow: Address, to: Address) -> Result<Amount, EscrowError>;

    /// Owner of `escrow`.
    fn owner(&self, escrow: Address) -> Result<Address, EscrowError>;
}
