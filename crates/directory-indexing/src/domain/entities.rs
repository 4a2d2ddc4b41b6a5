//! # Domain Entities
//!
//! Key metadata and the directory namespace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::graph::DirectoryGraph;

/// Metadata bound to a canonical 44-character identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    /// Human-readable name: last path segment, directory label, or empty.
    pub label: String,
    /// Free-form memo text carried by the binding transaction.
    pub memo: String,
    /// Revision number from the path key's trailing `+` run.
    pub revision: u32,
    /// Unix seconds at which this identifier was first bound.
    pub time: i64,
}

/// A named namespace announced by a labelling transaction.
///
/// Owns one graph and one balance table; both live for the indexer's
/// lifetime once created.
#[derive(Debug, Clone)]
pub struct Directory {
    /// Hex id of the labelling transaction that created the directory.
    pub id: String,
    /// Human label decoded from the labelling recipient.
    pub label: String,
    /// The directory's relevance graph.
    pub graph: DirectoryGraph,
    /// Per-identifier balances in the smallest ledger denomination.
    pub balances: HashMap<String, i64>,
}

impl Directory {
    /// A fresh directory with an empty graph and no balances.
    #[must_use]
    pub fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            graph: DirectoryGraph::new(),
            balances: HashMap::new(),
        }
    }

    /// Current balance of an identifier; unknown keys hold zero.
    #[must_use]
    pub fn balance(&self, key: &str) -> i64 {
        self.balances.get(key).copied().unwrap_or(0)
    }
}
