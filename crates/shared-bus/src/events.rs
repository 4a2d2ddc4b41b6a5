//! # Chain Events
//!
//! Event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockId};

/// Notification that the canonical chain tip moved.
///
/// One event is delivered per block connected to (or disconnected from)
/// the main chain. During a reorganization the processor emits a burst of
/// events; `more` is true on every event except the last, so consumers can
/// defer expensive recomputation until the burst settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipChange {
    /// The block that was connected or disconnected.
    pub block: Block,
    /// Identifier of that block.
    pub block_id: BlockId,
    /// True if the block joined the main chain, false if it left it.
    pub connect: bool,
    /// True if further events from the same burst are still queued.
    pub more: bool,
}

impl TipChange {
    /// A connect event outside any burst.
    pub fn connected(block: Block, block_id: BlockId) -> Self {
        Self {
            block,
            block_id,
            connect: true,
            more: false,
        }
    }
}
