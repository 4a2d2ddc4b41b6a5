//! # Directory Indexing Subsystem
//!
//! Interprets transactions on the ledger as operations on named
//! "directories": tree-like namespaces whose nodes are encoded in the
//! recipient field. As blocks join (or leave) the canonical chain, the
//! subsystem derives one weighted directed multigraph per directory -
//! capturing the spatial, temporal, revision and periodic dimensions of
//! each node's arrival - and maintains a PageRank-style relevance score
//! over every graph.
//!
//! ## Data Flow
//!
//! ```text
//! Ledger / BlockStore ──→ Indexer ──→ DirectoryGraph mutations
//!        ↑                   │
//!   [catch-up reads]         └──→ rank pass on burst quiescence
//!        │
//! Processor ──TipChange──→ [Event Bus] ──→ Indexer
//! ```
//!
//! ## Layers
//!
//! - **Domain** (`domain/`): path codec, graph engine, key metadata - pure
//!   logic, no I/O
//! - **Ports** (`ports/`): inbound indexing API, outbound ledger and block
//!   store contracts
//! - **Service** (`service/`): the indexer state machine and its reactive
//!   task
//! - **Adapters** (`adapters/`): in-memory chain backends for tests and
//!   embedders

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::codec::{
    diminishing_orders, inflate_nodes, is_labelling, pad44, pub_key_to_string, InflatedPath,
};
pub use domain::entities::{Directory, KeyState};
pub use domain::errors::{IndexerError, LedgerError, StoreError};
pub use domain::graph::{DirectoryGraph, GraphEdge, RankOutcome};
pub use domain::value_objects::{IndexerConfig, RankConfig};
pub use ports::inbound::DirectoryIndexApi;
pub use ports::outbound::{BlockStore, Ledger};
pub use service::{Indexer, IndexerService};
