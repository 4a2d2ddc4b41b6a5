//! # Adapters Layer
//!
//! Concrete backends for the outbound ports.

pub mod memory;

pub use memory::MemoryChain;
