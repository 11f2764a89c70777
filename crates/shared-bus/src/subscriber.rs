//! # Event Subscriber
//!
//! The receiving half of the bus. A subscription applies its filter locally
//! and keeps count of events it lost to overflow, so a consumer can tell a
//! quiet bus from a lossy one.

use crate::events::{EngineEvent, EventFilter};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Receiving handle returned by `InMemoryEventBus::subscribe`.
pub struct Subscription {
    receiver: broadcast::Receiver<EngineEvent>,
    filter: EventFilter,
    missed: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<EngineEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            missed: 0,
        }
    }

    /// Next matching event, or `None` once the bus is gone.
    ///
    /// Overflow does not end the subscription: the lost events are added to
    /// the missed count and receiving resumes at the oldest retained event.
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(lost)) => self.note_lag(lost),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event without waiting; `Ok(None)` when nothing is queued.
    pub fn try_recv(&mut self) -> Result<Option<EngineEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(lost)) => self.note_lag(lost),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Events lost to overflow since the last call, resetting the count.
    ///
    /// Lost events are counted before filtering, so a non-zero value means
    /// a matching event may have been among them.
    pub fn take_missed(&mut self) -> u64 {
        std::mem::take(&mut self.missed)
    }

    /// Filter applied to this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    fn note_lag(&mut self, lost: u64) {
        warn!(lost, topics = ?self.filter.topics, "[bus] subscriber fell behind");
        self.missed = self.missed.saturating_add(lost);
    }
}
