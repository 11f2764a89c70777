//! # Settlement Bridge Service
//!
//! Implements `SettlementBridgeApi`.

use crate::domain::{settlement_reference, SettlementConfig, SettlementError, SettlementOutcome};
use crate::ports::{PayoutGateway, SettlementBridgeApi, SettlementSource};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_bus::{EngineEvent, EventPublisher};
use shared_types::entities::{short_hex, Address, Participant, PartitionKey};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Settlement bridge.
///
/// Holds no trade state of its own. Which trades still need paying comes
/// from the source; locally it only tracks keys being settled right now,
/// failure counts, and keys given up on.
pub struct SettlementBridge {
    source: Arc<dyn SettlementSource>,
    payouts: Arc<dyn PayoutGateway>,
    bus: Arc<dyn EventPublisher>,
    agent: Participant,
    config: SettlementConfig,
    escrow: RwLock<Option<Address>>,
    in_flight: Mutex<HashSet<PartitionKey>>,
    failed: Mutex<HashMap<PartitionKey, u32>>,
    abandoned: Mutex<HashSet<PartitionKey>>,
}

/// Removes its key from the in-flight set on drop.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<PartitionKey>>,
    key: PartitionKey,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<PartitionKey>>, key: PartitionKey) -> Option<Self> {
        set.lock().insert(key).then_some(Self { set, key })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}

impl SettlementBridge {
    /// Create the bridge. `agent` must be a member of every group it settles.
    pub fn new(
        source: Arc<dyn SettlementSource>,
        payouts: Arc<dyn PayoutGateway>,
        bus: Arc<dyn EventPublisher>,
        agent: Participant,
        config: SettlementConfig,
    ) -> Self {
        Self {
            source,
            payouts,
            bus,
            agent,
            config,
            escrow: RwLock::new(None),
            in_flight: Mutex::new(HashSet::new()),
            failed: Mutex::new(HashMap::new()),
            abandoned: Mutex::new(HashSet::new()),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Escrow currently bound.
    pub fn escrow(&self) -> Option<Address> {
        *self.escrow.read()
    }

    async fn settle(&self, key: PartitionKey) -> Result<SettlementOutcome, SettlementError> {
        let terms = self.source.terms(&key, &self.agent)?;
        if terms.already_settled {
            self.forget(&key);
            debug!("[pt-05] Trade {} already settled", key.trade);
            return Ok(SettlementOutcome::AlreadySettled);
        }

        let paid = match self.escrow() {
            Some(escrow) => {
                self.payouts
                    .pay(
                        escrow,
                        self.agent.address(),
                        terms.seller,
                        terms.amount,
                        settlement_reference(&key),
                    )
                    .await
            }
            None => Err(SettlementError::NoEscrow),
        };

        let record = match paid {
            Ok(record) => record,
            Err(e) => return self.record_failure(key, e).await,
        };
        if record.replayed {
            info!(
                "[pt-05] Payout for trade {} was already made, completing",
                key.trade
            );
        }

        if let Err(e) = self.source.mark_settled(&key, &self.agent, record.receipt) {
            // Funds moved; keep the key so a re-drive completes the record.
            self.failed.lock().entry(key).or_insert(0);
            error!("[pt-05] Paid trade {} but could not mark it: {}", key.trade, e);
            return Err(e);
        }
        self.forget(&key);

        info!(
            "[pt-05] Trade {} settled, receipt {}",
            key.trade, record.receipt
        );
        self.bus
            .publish(EngineEvent::SettlementCompleted {
                trade: key.trade,
                receipt: record.receipt,
            })
            .await;
        Ok(SettlementOutcome::Settled {
            receipt: record.receipt,
        })
    }

    fn forget(&self, key: &PartitionKey) {
        self.failed.lock().remove(key);
        self.abandoned.lock().remove(key);
    }

    async fn record_failure(
        &self,
        key: PartitionKey,
        cause: SettlementError,
    ) -> Result<SettlementOutcome, SettlementError> {
        let reason = cause.to_string();
        let attempts = match self
            .source
            .record_failure(&key, &self.agent, cause.private_detail())
        {
            Ok(attempts) => attempts,
            Err(e) => {
                // Unrecorded, but the trade still needs paying.
                *self.failed.lock().entry(key).or_insert(0) += 1;
                error!(
                    "[pt-05] Settlement of trade {} failed ({}) and could not be recorded: {}",
                    key.trade, reason, e
                );
                return Err(e);
            }
        };
        warn!(
            "[pt-05] Settlement of trade {} failed (attempt {}/{}): {}",
            key.trade, attempts, self.config.max_attempts, reason
        );

        self.bus
            .publish(EngineEvent::SettlementFailed {
                key,
                attempts,
                reason: reason.clone(),
            })
            .await;

        if attempts >= self.config.max_attempts {
            self.failed.lock().remove(&key);
            self.abandoned.lock().insert(key);
            error!(
                "[pt-05] Giving up on trade {} after {} attempts",
                key.trade, attempts
            );
            self.bus
                .publish(EngineEvent::CriticalError {
                    key,
                    error: format!("settlement exhausted {attempts} attempts: {reason}"),
                })
                .await;
        } else {
            self.failed.lock().insert(key, attempts);
        }

        Ok(SettlementOutcome::Failed { attempts, reason })
    }
}

#[async_trait]
impl SettlementBridgeApi for SettlementBridge {
    async fn on_confirmed(
        &self,
        key: PartitionKey,
    ) -> Result<SettlementOutcome, SettlementError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, key) else {
            debug!("[pt-05] Settlement of trade {} already running", key.trade);
            return Ok(SettlementOutcome::InProgress);
        };
        self.settle(key).await
    }

    async fn redrive(&self) -> Vec<(PartitionKey, Result<SettlementOutcome, SettlementError>)> {
        let keys = self.pending();
        if !keys.is_empty() {
            info!("[pt-05] Re-driving {} unsettled trade(s)", keys.len());
        }
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            let outcome = self.on_confirmed(key).await;
            results.push((key, outcome));
        }
        results
    }

    fn bind_escrow(&self, escrow: Address) {
        info!("[pt-05] Payouts funded from escrow {}", short_hex(&escrow));
        *self.escrow.write() = Some(escrow);
    }

    fn pending(&self) -> Vec<PartitionKey> {
        let mut keys = self.source.unsettled(&self.agent).unwrap_or_else(|e| {
            warn!("[pt-05] Cannot list unsettled trades: {}", e);
            Vec::new()
        });
        keys.extend(self.failed.lock().keys().copied());
        let abandoned = self.abandoned.lock();
        keys.retain(|key| !abandoned.contains(key));
        keys.sort();
        keys.dedup();
        keys
    }
}
