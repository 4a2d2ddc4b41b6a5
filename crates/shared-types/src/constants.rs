//! # Ledger Constants
//!
//! The subset of ledger consensus constants the indexing subsystems care
//! about. Consensus proper (rewards, difficulty, maturity windows) is owned
//! by the ledger itself.

/// Maximum transaction memo length in bytes (ascii/utf8 only).
pub const MAX_MEMO_LENGTH: usize = 100;

/// Length of a base-64 encoded 32-byte public key, `=` padding included.
pub const PUB_KEY_STRING_LENGTH: usize = 44;
