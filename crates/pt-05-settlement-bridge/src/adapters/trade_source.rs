//! Trade Source Adapter
//!
//! Implements `SettlementSource` on top of `TradeLifecycleApi`.

use crate::domain::{SettlementError, SettlementTerms};
use crate::ports::SettlementSource;
use pt_03_trade_lifecycle::{TradeError, TradeLifecycleApi, TradeState};
use shared_types::entities::{Participant, PartitionKey, ReceiptId};
use std::sync::Arc;

/// Reads and updates trades through the private partition, as the agent.
pub struct TradeSourceAdapter {
    trades: Arc<dyn TradeLifecycleApi>,
}

impl TradeSourceAdapter {
    /// Wrap a trade lifecycle service.
    pub fn new(trades: Arc<dyn TradeLifecycleApi>) -> Self {
        Self { trades }
    }
}

fn map_trade_error(err: TradeError) -> SettlementError {
    match err {
        TradeError::AccessDenied => SettlementError::TradeUnavailable,
        TradeError::InvalidState { state, .. } => SettlementError::NotConfirmed {
            state: state.to_string(),
        },
        other => SettlementError::Record(other.to_string()),
    }
}

impl SettlementSource for TradeSourceAdapter {
    fn terms(
        &self,
        key: &PartitionKey,
        agent: &Participant,
    ) -> Result<SettlementTerms, SettlementError> {
        let trade = self.trades.trade(key, agent).map_err(map_trade_error)?;
        let already_settled = match trade.state {
            TradeState::Confirmed => false,
            TradeState::Settled => true,
            other => {
                return Err(SettlementError::NotConfirmed {
                    state: other.to_string(),
                })
            }
        };
        Ok(SettlementTerms {
            seller: trade.item.seller,
            amount: trade.item.price,
            already_settled,
        })
    }

    fn mark_settled(
        &self,
        key: &PartitionKey,
        agent: &Participant,
        receipt: ReceiptId,
    ) -> Result<(), SettlementError> {
        self.trades
            .mark_settled(key, agent, receipt)
            .map(|_| ())
            .map_err(map_trade_error)
    }

    fn unsettled(&self, agent: &Participant) -> Result<Vec<PartitionKey>, SettlementError> {
        self.trades
            .awaiting_settlement(agent)
            .map_err(map_trade_error)
    }

    fn record_failure(
        &self,
        key: &PartitionKey,
        agent: &Participant,
        reason: String,
    ) -> Result<u32, SettlementError> {
        self.trades
            .record_settlement_failure(key, agent, reason)
            .map_err(map_trade_error)
    }
}
