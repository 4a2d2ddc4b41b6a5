//! # Inbound Ports (Driving Ports)
//!
//! The operations that drive the directory index, plus the read accessors
//! exposed over the derived state. The indexing task is the sole writer
//! and the sole reader while running; the accessors serve tests and
//! embedders that take ownership of the state after shutdown.

use shared_types::{Block, BlockId};

use crate::domain::entities::{Directory, KeyState};

/// Primary API of the directory indexing subsystem.
pub trait DirectoryIndexApi {
    /// Apply every transaction of a block, in order, to the per-directory
    /// graphs, balances and key metadata.
    ///
    /// `connect` is false for a block leaving the main chain; the
    /// disconnect path currently applies a zero increment rather than a
    /// true reversal.
    fn index_transactions(&mut self, block: &Block, block_id: BlockId, connect: bool);

    /// Recompute rankings on every directory graph.
    fn rank_graphs(&mut self);

    /// Metadata bound to a canonical 44-character identifier.
    fn key_state(&self, key: &str) -> Option<&KeyState>;

    /// Directory lookup by the hex id of its creating transaction.
    fn directory(&self, id: &str) -> Option<&Directory>;

    /// Directory lookup by human label. When several directories share a
    /// label the winner is unspecified.
    fn directory_by_label(&self, label: &str) -> Option<&Directory>;

    /// Number of directories seen so far.
    fn directory_count(&self) -> usize;

    /// Identifier of the most recently indexed block.
    fn latest_block_id(&self) -> BlockId;

    /// Height of the most recently indexed block.
    fn latest_height(&self) -> i64;
}
