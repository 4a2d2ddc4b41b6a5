//! # Indexer State Machine
//!
//! The semantic core: per-transaction dispatch into the labelling,
//! directory-credit and path-inflation cases, the four dimension edge
//! sets, and the rank pass over every directory.

use std::collections::HashMap;

use chrono::DateTime;
use shared_types::{Block, BlockId, Transaction};
use tracing::{info, warn};

use crate::domain::codec::{
    diminishing_orders, inflate_nodes, is_labelling, pad44, pub_key_to_string,
};
use crate::domain::entities::{Directory, KeyState};
use crate::domain::value_objects::RankConfig;
use crate::ports::inbound::DirectoryIndexApi;

/// Derived state over the chain: directories, their graphs and balances,
/// and the global key metadata map.
///
/// The state is reconstructable from the ledger and never persisted.
#[derive(Debug, Clone)]
pub struct Indexer {
    latest_block_id: BlockId,
    latest_height: i64,
    key_state: HashMap<String, KeyState>,
    directories: HashMap<String, Directory>,
    rank: RankConfig,
}

impl Indexer {
    /// Fresh state positioned at the resume block.
    #[must_use]
    pub fn new(resume_block_id: BlockId, rank: RankConfig) -> Self {
        Self {
            latest_block_id: resume_block_id,
            latest_height: 0,
            key_state: HashMap::new(),
            directories: HashMap::new(),
            rank,
        }
    }

    /// Iterate all directories in unspecified order.
    pub fn directories(&self) -> impl Iterator<Item = &Directory> + '_ {
        self.directories.values()
    }

    fn index_transaction(&mut self, block: &Block, txn: &Transaction, connect: bool) {
        let txid = match txn.id() {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "skipping transaction with uncomputable id");
                return;
            }
        };

        let txn_from = pub_key_to_string(txn.from.as_ref());
        let txn_to = pub_key_to_string(Some(&txn.to));
        let height = block.header.height;

        // A disconnected block runs the same path with a zero increment;
        // true reversal remains an open defect.
        let increment_by = if connect { txn.amount } else { 0 };

        // Labelling: announce a directory, or bind a label to the sender.
        if let Some(label) = is_labelling(&txn_to) {
            if txn.from.is_none() {
                let directory_id = txid.to_string();
                info!(directory = %directory_id, label = %label, "directory announced");
                self.directories
                    .insert(directory_id.clone(), Directory::new(directory_id, label));
            } else {
                let state = self.key_state.entry(txn_from).or_default();
                state.label = label;
                state.memo = txn.memo.trim().to_string();
            }
            return;
        }

        // Credit: the memo names a directory id, the amount funds the
        // recipient inside that directory.
        let memo_key = txn.memo.trim_matches('/');
        if let Some(directory) = self.directories.get_mut(memo_key) {
            if directory.graph.is_parent_descendant(&txn_to, &txn_from) {
                // The transfer would close a cycle.
                return;
            }

            *directory.balances.entry(txn_to.clone()).or_insert(0) += increment_by;

            if directory.balance(&txn_from) > 0 {
                directory
                    .graph
                    .link(&txn_from, &txn_to, increment_by, height, txn.time);
                *directory.balances.entry(txn_from).or_insert(0) -= increment_by;
            } else {
                directory
                    .graph
                    .link(&pad44("0"), &txn_to, increment_by, height, txn.time);
            }
            return;
        }

        // Path insertion: the recipient encodes a path in some directory.
        let Some(path) = inflate_nodes(&txn_to) else {
            return;
        };

        // Label scan; with duplicate labels the last match wins, in
        // unspecified map order.
        let mut directory_id = None;
        for (id, directory) in &self.directories {
            if directory.label == path.root_label {
                directory_id = Some(id.clone());
            }
        }
        let Some(directory_id) = directory_id else {
            return;
        };
        let Some(directory) = self.directories.get_mut(&directory_id) else {
            return;
        };

        if directory.balance(&txn_from) < increment_by {
            // Insufficient balance; skip the transaction.
            return;
        }

        directory
            .graph
            .link(&txn_from, &txn_to, increment_by, height, txn.time);
        *directory.balances.entry(txn_from).or_insert(0) -= increment_by;

        let state = self.key_state.entry(pad44(&txn_to)).or_default();
        state.time = txn.time;
        state.revision = path.revision;
        state.label = path.nodes.last().cloned().unwrap_or_default();
        state.memo = txn.memo.clone();

        // Each dimension carries a quarter of the amount; distinct time
        // offsets totally order the synthetic edges.
        let dimension_weight = increment_by / 4;
        let graph = &mut directory.graph;

        // Temporal quarter, staggered +20.
        let stamp = DateTime::from_timestamp(txn.time, 0).unwrap_or(DateTime::UNIX_EPOCH);
        let day = stamp.format("%Y+%m+%d").to_string();
        let month = stamp.format("%Y+%m").to_string();
        let year = stamp.format("%Y").to_string();
        graph.link(&txn_to, &day, dimension_weight, height, txn.time + 20);
        graph.link(&day, &month, dimension_weight, height, txn.time + 21);
        graph.link(&month, &year, dimension_weight, height, txn.time + 22);
        graph.link(&year, "0", dimension_weight, height, txn.time + 23);

        // Revision quarter, staggered +30.
        let revision_node = format!("+{}", path.revision);
        graph.link(&txn_to, &revision_node, dimension_weight, height, txn.time + 30);
        graph.link(&revision_node, "0", dimension_weight, height, txn.time + 31);

        // Spatial quarter, staggered +40: walk the path leaf to root.
        let reversed: Vec<&String> = path.nodes.iter().rev().collect();
        for i in 0..reversed.len() {
            let additive = 40 + i as i64;
            if i == 0 {
                graph.link(&txn_to, reversed[0], dimension_weight, height, txn.time + additive);
            }
            if i + 1 < reversed.len() {
                graph.link(
                    reversed[i],
                    reversed[i + 1],
                    dimension_weight,
                    height,
                    txn.time + additive + i as i64 + 1,
                );
            }
            if i == reversed.len() - 1 {
                graph.link(
                    reversed[i],
                    "0",
                    dimension_weight,
                    height,
                    txn.time + additive + i as i64 + 1,
                );
            }
        }

        // Periodic quarter, staggered +10: the height and its diminishing
        // orders.
        let height_node = height.to_string();
        graph.link(&txn_to, &height_node, dimension_weight, height, txn.time + 10);
        let orders = diminishing_orders(height);
        for j in 1..orders.len() {
            graph.link(
                &orders[j - 1].to_string(),
                &orders[j].to_string(),
                dimension_weight,
                height,
                txn.time + 10 + j as i64,
            );
        }
    }
}

impl DirectoryIndexApi for Indexer {
    fn index_transactions(&mut self, block: &Block, block_id: BlockId, connect: bool) {
        self.latest_block_id = block_id;
        self.latest_height = block.header.height;

        for txn in &block.transactions {
            self.index_transaction(block, txn, connect);
        }
    }

    fn rank_graphs(&mut self) {
        info!(
            directories = self.directories.len(),
            height = self.latest_height,
            "ranking directory graphs"
        );
        for directory in self.directories.values_mut() {
            let outcome = directory.graph.rank(
                self.rank.damping,
                self.rank.tolerance,
                self.rank.max_iterations,
            );
            if !outcome.converged {
                warn!(
                    directory = %directory.id,
                    iterations = outcome.iterations,
                    "rank pass stopped at iteration cap before convergence"
                );
            }
        }
        info!(directories = self.directories.len(), "finished ranking");
    }

    fn key_state(&self, key: &str) -> Option<&KeyState> {
        self.key_state.get(key)
    }

    fn directory(&self, id: &str) -> Option<&Directory> {
        self.directories.get(id)
    }

    fn directory_by_label(&self, label: &str) -> Option<&Directory> {
        let mut found = None;
        for directory in self.directories.values() {
            if directory.label == label {
                found = Some(directory);
            }
        }
        found
    }

    fn directory_count(&self) -> usize {
        self.directories.len()
    }

    fn latest_block_id(&self) -> BlockId {
        self.latest_block_id
    }

    fn latest_height(&self) -> i64 {
        self.latest_height
    }
}
