//! # Shared Types - Ledger Entities
//!
//! Core entities of the ledger as consumed by the auxiliary subsystems:
//! blocks, block headers, transactions and their identifiers, plus the
//! branch classification the ledger reports for a stored block.
//!
//! Identifiers are SHA3-256 digests of the entity's canonical JSON
//! encoding, rendered as lowercase hex. Public keys are raw 32-byte
//! Ed25519 values; their string form (base-64, 44 characters) is owned by
//! the consumers that need it.

pub mod constants;
pub mod entities;

pub use constants::{MAX_MEMO_LENGTH, PUB_KEY_STRING_LENGTH};
pub use entities::{
    Block, BlockHeader, BlockId, BranchType, EntityError, Hash, PublicKey, Transaction,
    TransactionId,
};
