//! # Event Publisher
//!
//! The publishing half of the bus. Delivery is best effort: an event sent
//! while nobody listens is gone, so consumers that must not miss a fact
//! (the settlement worker) also reconcile from durable state.

use crate::events::{EngineEvent, EventFilter};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Publishing port the subsystems depend on.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event and return how many subscribers were attached when
    /// it was sent. Zero means the event reached nobody.
    async fn publish(&self, event: EngineEvent) -> usize;
}

/// Single-node bus over a `tokio::sync::broadcast` channel.
///
/// Each subscriber buffers up to `capacity` events; a subscriber that falls
/// further behind loses the oldest ones and is told how many through
/// [`Subscription::take_missed`].
pub struct InMemoryEventBus {
    sender: broadcast::Sender<EngineEvent>,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, capacity }
    }

    /// Attach a subscriber. It sees only events published after this call.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "[bus] subscriber attached");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Subscribers currently attached.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EngineEvent) -> usize {
        let topic = event.topic();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(topic = ?topic, receivers, "[bus] event published");
                receivers
            }
            Err(_) => {
                warn!(topic = ?topic, "[bus] event published with no subscribers");
                0
            }
        }
    }
}
