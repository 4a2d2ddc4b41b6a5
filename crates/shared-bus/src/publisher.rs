//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::events::TipChange;
use crate::subscriber::TipChangeSubscription;
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Trait for publishing tip changes to the bus.
///
/// This is the interface the chain processor uses to announce canonical
/// tip movement to whoever registered an interest.
#[async_trait]
pub trait TipChangePublisher: Send + Sync {
    /// Publish a tip change.
    ///
    /// Returns the number of active subscribers that received the event.
    async fn publish(&self, tip: TipChange) -> usize;

    /// Total number of events published so far.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the chain event bus.
///
/// Uses `tokio::sync::broadcast` for single-producer, multi-consumer
/// semantics. Suitable for in-process operation; a networked deployment
/// would put a different transport behind the same trait.
pub struct ChainEventBus {
    /// Broadcast sender for tip events.
    sender: broadcast::Sender<TipChange>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl ChainEventBus {
    /// Create a new bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new bus with the given per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Register for tip changes.
    ///
    /// The registration lasts as long as the returned subscription;
    /// dropping it unregisters.
    #[must_use]
    pub fn subscribe(&self) -> TipChangeSubscription {
        debug!("new tip change subscription");
        TipChangeSubscription::new(self.sender.subscribe())
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The per-subscriber channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ChainEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TipChangePublisher for ChainEventBus {
    async fn publish(&self, tip: TipChange) -> usize {
        let block_id = tip.block_id;
        let height = tip.block.header.height;

        // The event was attempted even if nobody is listening.
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(tip) {
            Ok(receiver_count) => {
                debug!(
                    block_id = %block_id,
                    height,
                    receivers = receiver_count,
                    "tip change published"
                );
                receiver_count
            }
            Err(e) => {
                warn!(
                    block_id = %block_id,
                    height,
                    error = %e,
                    "tip change dropped (no receivers)"
                );
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Block, BlockId};

    fn tip() -> TipChange {
        TipChange::connected(Block::default(), BlockId::default())
    }

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let bus = ChainEventBus::new();

        let receivers = bus.publish(tip()).await;
        assert_eq!(receivers, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_publish_with_subscriber() {
        let bus = ChainEventBus::new();

        let mut sub = bus.subscribe();
        let receivers = bus.publish(tip()).await;

        assert_eq!(receivers, 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(sub.recv().await, Some(tip()));
    }

    #[tokio::test]
    async fn test_drop_unregisters() {
        let bus = ChainEventBus::new();

        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(tip()).await, 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = ChainEventBus::new();

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();

        let receivers = bus.publish(tip()).await;
        assert_eq!(receivers, 2);
    }

    #[test]
    fn test_custom_capacity() {
        let bus = ChainEventBus::with_capacity(8);
        assert_eq!(bus.capacity(), 8);
    }
}
