//! # Outbound Ports (Driven Ports)
//!
//! Contracts the indexing subsystem consumes from its chain collaborators.
//! Reads are synchronous: the catch-up phase deliberately blocks on them,
//! and both backends are assumed safe for concurrent reading.

use shared_types::{Block, BlockHeader, BlockId, BranchType};

use crate::domain::errors::{LedgerError, StoreError};

/// Read access to chain consensus state.
pub trait Ledger: Send + Sync {
    /// Whether the node still considers itself in initial block download.
    ///
    /// Indexing is pointless (and slows the sync) until this turns false.
    fn is_initial_block_download(&self) -> Result<bool, LedgerError>;

    /// Branch classification for a stored block.
    fn get_branch_type(&self, block_id: &BlockId) -> Result<BranchType, LedgerError>;

    /// Identifier of the main-chain block at the given height, if any.
    fn get_block_id_for_height(&self, height: i64) -> Result<Option<BlockId>, LedgerError>;
}

/// Read access to stored blocks.
pub trait BlockStore: Send + Sync {
    /// Header of a stored block.
    fn get_block_header(&self, block_id: &BlockId) -> Result<Option<BlockHeader>, StoreError>;

    /// Full block with transactions.
    fn get_block(&self, block_id: &BlockId) -> Result<Option<Block>, StoreError>;
}
