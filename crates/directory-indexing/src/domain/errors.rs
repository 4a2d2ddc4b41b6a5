//! # Domain Errors
//!
//! Error taxonomy for the directory indexing subsystem.
//!
//! Startup precondition violations terminate the indexing task; individual
//! transactions that fail to decode are skipped without mutating state;
//! unfetchable tip blocks are logged and the task continues.

use shared_types::BlockId;
use thiserror::Error;

/// Failure reading chain consensus state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Underlying read failed.
    #[error("ledger i/o error: {0}")]
    Io(String),
    /// The ledger's own records are inconsistent.
    #[error("ledger state corrupt: {0}")]
    Corrupt(String),
}

/// Failure reading the block store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying read failed.
    #[error("block store i/o error: {0}")]
    Io(String),
    /// A stored block could not be decoded.
    #[error("block deserialization failed: {0}")]
    Deserialization(String),
}

/// Failures that terminate the indexing task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexerError {
    /// The configured resume block has no stored header.
    #[error("resume block {0} has no stored header")]
    UnknownResumeBlock(BlockId),
    /// The configured resume block is off the canonical chain.
    #[error("resume block {0} is not on the main branch")]
    NotMainBranch(BlockId),
    /// The ledger mapped a height to a block the store does not have.
    #[error("block {0} missing from the store")]
    MissingBlock(BlockId),
    /// Ledger read failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Block store read failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
