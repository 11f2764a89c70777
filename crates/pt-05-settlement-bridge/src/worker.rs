//! # Settlement Worker
//!
//! Listens for `DeliveryConfirmed` on the bus and settles each trade in its
//! own task. Everything confirmed but unsettled is re-driven when the worker
//! starts, on a fixed interval, and right after the subscription overflows.

use crate::domain::{SettlementError, SettlementOutcome};
use crate::ports::SettlementBridgeApi;
use crate::service::SettlementBridge;
use shared_bus::{EngineEvent, EventFilter, EventTopic, Subscription};
use shared_types::entities::PartitionKey;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Background settlement handler.
pub struct SettlementWorker {
    bridge: Arc<SettlementBridge>,
    subscription: Subscription,
    redrive_every: Duration,
}

impl SettlementWorker {
    /// Bus filter the worker's subscription should use.
    pub fn filter() -> EventFilter {
        EventFilter::topics(vec![EventTopic::TradeLifecycle])
    }

    /// Create a worker over an existing subscription.
    pub fn new(bridge: Arc<SettlementBridge>, subscription: Subscription) -> Self {
        let redrive_every = bridge.config().redrive_interval();
        Self {
            bridge,
            subscription,
            redrive_every,
        }
    }

    /// Run until the bus closes or `shutdown` flips.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[pt-05] Settlement worker started");

        // The first tick completes immediately, covering confirmations made
        // while no worker was listening.
        let mut ticker = tokio::time::interval(self.redrive_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let missed = self.subscription.take_missed();
            if missed > 0 {
                warn!("[pt-05] Missed {} bus event(s), re-driving now", missed);
                redrive_logged(&self.bridge).await;
            }

            tokio::select! {
                event = self.subscription.recv() => match event {
                    Some(EngineEvent::DeliveryConfirmed { key }) => {
                        let bridge = Arc::clone(&self.bridge);
                        tokio::spawn(async move { settle_logged(&bridge, key).await });
                    }
                    Some(_) => {}
                    None => {
                        warn!("[pt-05] Event bus closed, settlement worker stopping");
                        break;
                    }
                },
                _ = ticker.tick() => redrive_logged(&self.bridge).await,
                _ = shutdown.changed() => {
                    info!("[pt-05] Shutdown signal received");
                    break;
                }
            }
        }
    }
}

async fn settle_logged(bridge: &SettlementBridge, key: PartitionKey) {
    let result = bridge.on_confirmed(key).await;
    log_result(key, result);
}

async fn redrive_logged(bridge: &SettlementBridge) {
    for (key, result) in bridge.redrive().await {
        log_result(key, result);
    }
}

fn log_result(key: PartitionKey, result: Result<SettlementOutcome, SettlementError>) {
    match result {
        Ok(SettlementOutcome::Settled { receipt }) => {
            debug!("[pt-05] Trade {} settled by worker ({})", key.trade, receipt)
        }
        Ok(SettlementOutcome::Failed { attempts, .. }) => {
            debug!("[pt-05] Trade {} pending re-drive ({} attempts)", key.trade, attempts)
        }
        Ok(_) => {}
        Err(e) => error!("[pt-05] Settlement of trade {} errored: {}", key.trade, e),
    }
}
