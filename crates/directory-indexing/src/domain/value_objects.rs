//! # Value Objects
//!
//! Immutable configuration for the indexing subsystem.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::BlockId;

/// Convergence and safety parameters for the rank pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    /// PageRank damping factor α. The steady-state invocation runs with
    /// 1.0: pure mass flow, dangling mass redistributed uniformly.
    pub damping: f64,
    /// L1 convergence tolerance ε.
    pub tolerance: f64,
    /// Safety cap on iterations; hitting it is logged, not fatal.
    pub max_iterations: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: 1.0,
            tolerance: 1e-6,
            max_iterations: 200,
        }
    }
}

/// Configuration for the indexing service.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Block to resume forward indexing from; must be stored and on the
    /// main branch.
    pub resume_block_id: BlockId,
    /// How often to re-check initial block download before starting.
    pub sync_poll_interval: Duration,
    /// Rank parameters applied to every directory graph.
    pub rank: RankConfig,
}

impl IndexerConfig {
    /// Defaults: 30-second sync poll, rank with α = 1.0 and ε = 1e-6.
    #[must_use]
    pub fn new(resume_block_id: BlockId) -> Self {
        Self {
            resume_block_id,
            sync_poll_interval: Duration::from_secs(30),
            rank: RankConfig::default(),
        }
    }
}
