//! # Event Subscriber
//!
//! Defines the subscription side of the event bus.

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use crate::events::TipChange;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("event bus closed")]
    Closed,
}

/// A registration for tip changes.
///
/// Dropping the subscription unregisters it from the bus.
pub struct TipChangeSubscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<TipChange>,
}

impl TipChangeSubscription {
    pub(crate) fn new(receiver: broadcast::Receiver<TipChange>) -> Self {
        Self { receiver }
    }

    /// Receive the next tip change.
    ///
    /// Returns `None` once the bus has been dropped. A lagged receiver
    /// skips to the oldest retained event and keeps going.
    pub async fn recv(&mut self) -> Option<TipChange> {
        loop {
            match self.receiver.recv().await {
                Ok(tip) => return Some(tip),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "tip subscriber lagged, events dropped");
                }
            }
        }
    }

    /// Try to receive the next tip change without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tip))` - an event was waiting
    /// - `Ok(None)` - no event available (would block)
    /// - `Err(SubscriptionError::Closed)` - the bus was dropped
    pub fn try_recv(&mut self) -> Result<Option<TipChange>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(tip) => return Ok(Some(tip)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }
}

impl Drop for TipChangeSubscription {
    fn drop(&mut self) {
        // The receiver handle is the registration; letting it go is the
        // unregister.
        debug!("tip change subscription dropped");
    }
}
