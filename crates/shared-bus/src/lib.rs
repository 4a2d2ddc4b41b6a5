//! # Shared Bus - Chain Event Delivery
//!
//! Delivers tip-change notifications from the chain processor to the
//! auxiliary subsystems that track the canonical chain.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Processor   │                    │   Indexer    │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Subscriptions are scoped: dropping a [`TipChangeSubscription`] is the
//! unregister path, so a subscriber that exits on any path releases its
//! registration.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::TipChange;
pub use publisher::{ChainEventBus, TipChangePublisher};
pub use subscriber::{SubscriptionError, TipChangeSubscription};

/// Maximum tip events buffered per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
