//! # In-Memory Chain Adapter
//!
//! A main chain held entirely in memory, implementing both outbound
//! ports. Used by the integration tests and by embedders that feed the
//! indexer a synthetic chain.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{Block, BlockHeader, BlockId, BranchType, EntityError};

use crate::domain::errors::{LedgerError, StoreError};
use crate::ports::outbound::{BlockStore, Ledger};

#[derive(Default)]
struct ChainState {
    blocks: HashMap<BlockId, Block>,
    branches: HashMap<BlockId, BranchType>,
    heights: HashMap<i64, BlockId>,
    initial_block_download: bool,
}

/// An in-memory chain safe for concurrent reading.
#[derive(Default)]
pub struct MemoryChain {
    state: RwLock<ChainState>,
}

impl MemoryChain {
    /// An empty chain, considered synced.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the initial-block-download flag.
    pub fn set_initial_block_download(&self, syncing: bool) {
        self.state.write().initial_block_download = syncing;
    }

    /// Append a block to the main chain at its header height.
    pub fn push_main(&self, block: Block) -> Result<BlockId, EntityError> {
        let block_id = block.id()?;
        let mut state = self.state.write();
        state.heights.insert(block.header.height, block_id);
        state.branches.insert(block_id, BranchType::Main);
        state.blocks.insert(block_id, block);
        Ok(block_id)
    }

    /// Store a block on a side branch; it stays invisible to height
    /// lookups.
    pub fn push_side(&self, block: Block) -> Result<BlockId, EntityError> {
        let block_id = block.id()?;
        let mut state = self.state.write();
        state.branches.insert(block_id, BranchType::Side);
        state.blocks.insert(block_id, block);
        Ok(block_id)
    }
}

impl Ledger for MemoryChain {
    fn is_initial_block_download(&self) -> Result<bool, LedgerError> {
        Ok(self.state.read().initial_block_download)
    }

    fn get_branch_type(&self, block_id: &BlockId) -> Result<BranchType, LedgerError> {
        Ok(self
            .state
            .read()
            .branches
            .get(block_id)
            .copied()
            .unwrap_or(BranchType::Unknown))
    }

    fn get_block_id_for_height(&self, height: i64) -> Result<Option<BlockId>, LedgerError> {
        Ok(self.state.read().heights.get(&height).copied())
    }
}

impl BlockStore for MemoryChain {
    fn get_block_header(&self, block_id: &BlockId) -> Result<Option<BlockHeader>, StoreError> {
        Ok(self
            .state
            .read()
            .blocks
            .get(block_id)
            .map(|block| block.header.clone()))
    }

    fn get_block(&self, block_id: &BlockId) -> Result<Option<Block>, StoreError> {
        Ok(self.state.read().blocks.get(block_id).cloned())
    }
}
