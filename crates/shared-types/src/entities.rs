//! # Core Domain Entities
//!
//! Defines the ledger entities consumed by the indexing subsystems.
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, `BlockHeader`, `Transaction`
//! - **Identity**: `BlockId`, `TransactionId`, `PublicKey`
//! - **Classification**: `BranchType`

use std::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use thiserror::Error;

/// A 32-byte hash (SHA3-256).
pub type Hash = [u8; 32];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Failure to derive an entity's canonical form.
#[derive(Debug, Error)]
pub enum EntityError {
    /// The canonical JSON encoding could not be produced.
    #[error("canonical encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Unique identifier of a block: the hash of its canonical header encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BlockId(pub Hash);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Unique identifier of a transaction: the hash of its canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TransactionId(pub Hash);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Where a stored block sits relative to the canonical chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchType {
    /// On the canonical (longest) chain.
    Main,
    /// On a known side branch.
    Side,
    /// Parent unknown; not connected to the chain.
    Orphan,
    /// Not classified by the ledger.
    Unknown,
}

/// The header of a block containing chain linkage and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Identifier of the parent block (creates the chain linkage).
    pub previous: BlockId,
    /// Block height in the chain. Signed: external contracts count down
    /// past zero when probing below the resume block.
    pub height: i64,
    /// Unix timestamp when the block was mined.
    pub time: i64,
}

/// A block: header plus ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// All transactions in this block, in consensus order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Compute this block's identifier from its canonical header encoding.
    pub fn id(&self) -> Result<BlockId, EntityError> {
        let encoded = serde_json::to_vec(&self.header)?;
        Ok(BlockId(digest(&encoded)))
    }
}

/// A transfer on the ledger.
///
/// The sender is absent for coinbase transactions and for directory
/// announcements; the canonical string form of the absent sender is owned
/// by the path codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unix timestamp the sender attached.
    pub time: i64,
    /// Sender's nonce; collision avoidance only, no replay ordering.
    pub nonce: u32,
    /// Sender's public key; `None` for coinbase.
    pub from: Option<PublicKey>,
    /// Recipient's public key.
    pub to: PublicKey,
    /// Amount in the smallest ledger denomination.
    pub amount: i64,
    /// Miner fee in the smallest ledger denomination; zero for coinbase.
    pub fee: i64,
    /// Free-form memo, at most [`crate::MAX_MEMO_LENGTH`] bytes.
    pub memo: String,
}

impl Transaction {
    /// Whether this transaction mints rather than transfers.
    pub fn is_coinbase(&self) -> bool {
        self.from.is_none()
    }

    /// Compute this transaction's identifier from its canonical encoding.
    pub fn id(&self) -> Result<TransactionId, EntityError> {
        let encoded = serde_json::to_vec(self)?;
        Ok(TransactionId(digest(&encoded)))
    }
}

fn digest(data: &[u8]) -> Hash {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}
