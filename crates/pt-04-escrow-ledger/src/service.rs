//! # Escrow Ledger Service
//!
//! Implements `EscrowLedgerApi` over in-memory escrow accounts and
//! publishes the public `Receive` / `PayTo` facts on the bus.

use crate::domain::{EscrowAccount, EscrowError, Payout, PayoutReceipt};
use crate::ports::EscrowLedgerApi;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_bus::{EngineEvent, EventPublisher};
use shared_types::entities::{short_hex, Address, Amount, Hash};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// In-memory escrow ledger holding every deployed escrow.
pub struct EscrowLedger {
    escrows: RwLock<HashMap<Address, Arc<Mutex<EscrowAccount>>>>,
    bus: Arc<dyn EventPublisher>,
}

impl EscrowLedger {
    /// Create an empty ledger.
    pub fn new(bus: Arc<dyn EventPublisher>) -> Self {
        Self {
            escrows: RwLock::new(HashMap::new()),
            bus,
        }
    }

    fn account(&self, escrow: &Address) -> Result<Arc<Mutex<EscrowAccount>>, EscrowError> {
        self.escrows
            .read()
            .get(escrow)
            .cloned()
            .ok_or(EscrowError::EscrowNotFound(*escrow))
    }

    async fn pay(
        &self,
        escrow: Address,
        caller: Address,
        to: Address,
        amount: Amount,
        reference: Option<Hash>,
    ) -> Result<Payout, EscrowError> {
        let account = self.account(&escrow)?;
        let result = account.lock().pay(&caller, to, amount, reference);

        match &result {
            Ok(Payout::Paid(receipt)) => {
                info!(
                    "[pt-04] PayTo {} value {} from escrow {} (balance {})",
                    short_hex(&to),
                    amount,
                    short_hex(&escrow),
                    receipt.balance_after
                );
                self.bus
                    .publish(EngineEvent::FundsReleased { escrow, to, amount })
                    .await;
            }
            Ok(Payout::AlreadyPaid(receipt)) => {
                debug!(
                    "[pt-04] Reference already paid from escrow {} ({})",
                    short_hex(&escrow),
                    receipt.receipt
                );
            }
            Err(e) => {
                warn!("[pt-04] PayTo from escrow {} rejected: {}", short_hex(&escrow), e);
            }
        }
        result
    }
}

#[async_trait]
impl EscrowLedgerApi for EscrowLedger {
    fn deploy(&self, escrow: Address, owner: Address) -> Result<(), EscrowError> {
        let mut escrows = self.escrows.write();
        if escrows.contains_key(&escrow) {
            return Err(EscrowError::AlreadyDeployed(escrow));
        }
        escrows.insert(escrow, Arc::new(Mutex::new(EscrowAccount::new(escrow, owner))));
        info!(
            "[pt-04] Escrow {} deployed, owner {}",
            short_hex(&escrow),
            short_hex(&owner)
        );
        Ok(())
    }

    async fn prepay(
        &self,
        escrow: Address,
        from: Address,
        amount: Amount,
    ) -> Result<Amount, EscrowError> {
        let account = self.account(&escrow)?;
        let balance = account.lock().deposit(amount)?;

        info!(
            "[pt-04] Receive {} value {} into escrow {} (balance {})",
            short_hex(&from),
            amount,
            short_hex(&escrow),
            balance
        );
        self.bus
            .publish(EngineEvent::FundsDeposited {
                escrow,
                from,
                amount,
            })
            .await;
        Ok(balance)
    }

    async fn pay_to(
        &self,
        escrow: Address,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<PayoutReceipt, EscrowError> {
        let payout = self.pay(escrow, caller, to, amount, None).await?;
        Ok(payout.receipt().clone())
    }

    async fn pay_to_with_reference(
        &self,
        escrow: Address,
        caller: Address,
        to: Address,
        amount: Amount,
        reference: Hash,
    ) -> Result<Payout, EscrowError> {
        self.pay(escrow, caller, to, amount, Some(reference)).await
    }

    fn get_balance(&self, escrow: Address) -> Result<Amount, EscrowError> {
        Ok(self.account(&escrow)?.lock().balance)
    }

    fn credited(&self, escrow: Address, to: Address) -> Result<Amount, EscrowError> {
        Ok(self
            .account(&escrow)?
            .lock()
            .credited
            .get(&to)
            .copied()
            .unwrap_or_default())
    }

    fn owner(&self, escrow: Address) -> Result<Address, EscrowError> {
        Ok(self.account(&escrow)?.lock().owner)
    }
}
