//! # Ports Layer
//!
//! Inbound: the API that drives the directory index. Outbound: the
//! contracts this subsystem consumes from the ledger and block store.

pub mod inbound;
pub mod outbound;
