//! # Indexer Task
//!
//! The reactive loop around the state machine: wait out initial block
//! download, replay the main chain forward from the resume block, then
//! follow tip changes and re-rank on burst quiescence.
//!
//! The task is the sole owner of all derived state; the only concurrency
//! is with the shutdown signaller and the tip-change feed, both delivered
//! over channels and observed at explicit suspension points.

use std::sync::Arc;

use shared_bus::ChainEventBus;
use shared_types::BranchType;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::errors::IndexerError;
use crate::domain::value_objects::IndexerConfig;
use crate::ports::inbound::DirectoryIndexApi;
use crate::ports::outbound::{BlockStore, Ledger};
use crate::service::indexer::Indexer;

/// Handle to a running indexing task.
pub struct IndexerService {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<Indexer>,
}

impl IndexerService {
    /// Spawn the indexing task.
    #[must_use]
    pub fn spawn(
        ledger: Arc<dyn Ledger>,
        block_store: Arc<dyn BlockStore>,
        bus: Arc<ChainEventBus>,
        config: IndexerConfig,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(ledger, block_store, bus, config, shutdown_rx));
        Self { shutdown, handle }
    }

    /// Signal shutdown and wait for the task to observe it.
    ///
    /// Returns the final index state, or `None` if the task panicked.
    pub async fn shutdown(self) -> Option<Indexer> {
        let _ = self.shutdown.send(true);
        match self.handle.await {
            Ok(indexer) => {
                info!("indexer shutdown");
                Some(indexer)
            }
            Err(err) => {
                error!(error = %err, "indexer task failed");
                None
            }
        }
    }
}

async fn run(
    ledger: Arc<dyn Ledger>,
    block_store: Arc<dyn BlockStore>,
    bus: Arc<ChainEventBus>,
    config: IndexerConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Indexer {
    let mut indexer = Indexer::new(config.resume_block_id, config.rank);

    if !wait_for_sync(&*ledger, &mut shutdown, &config).await {
        return indexer;
    }

    if let Err(err) = catch_up(&mut indexer, &*ledger, &*block_store, &config) {
        error!(error = %err, "indexer startup failed");
        return indexer;
    }

    indexer.rank_graphs();

    // Registered for the task's remaining lifetime; dropping the
    // subscription on any exit path unregisters it.
    let mut tips = bus.subscribe();
    loop {
        tokio::select! {
            biased;

            tip = tips.recv() => {
                let Some(tip) = tip else {
                    error!("tip change feed closed, stopping");
                    break;
                };
                info!(
                    block_id = %tip.block_id,
                    height = tip.block.header.height,
                    connect = tip.connect,
                    "tip change"
                );
                indexer.index_transactions(&tip.block, tip.block_id, tip.connect);
                if !tip.more {
                    indexer.rank_graphs();
                }
            }

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("indexer shutting down");
                    break;
                }
            }
        }
    }

    indexer
}

/// Poll until initial block download completes.
///
/// Returns false when shutdown was requested or the ledger check failed;
/// either way the task must stop.
async fn wait_for_sync(
    ledger: &dyn Ledger,
    shutdown: &mut watch::Receiver<bool>,
    config: &IndexerConfig,
) -> bool {
    match ledger.is_initial_block_download() {
        Ok(false) => return true,
        Ok(true) => info!("waiting for blockchain sync"),
        Err(err) => {
            error!(error = %err, "initial block download check failed");
            return false;
        }
    }

    let mut ticker = tokio::time::interval(config.sync_poll_interval);
    ticker.tick().await; // the first tick completes immediately
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("indexer shutting down");
                    return false;
                }
            }

            _ = ticker.tick() => {
                match ledger.is_initial_block_download() {
                    Ok(false) => return true,
                    Ok(true) => {}
                    Err(err) => {
                        error!(error = %err, "initial block download check failed");
                        return false;
                    }
                }
            }
        }
    }
}

/// Replay the main chain forward from the resume block.
fn catch_up(
    indexer: &mut Indexer,
    ledger: &dyn Ledger,
    block_store: &dyn BlockStore,
    config: &IndexerConfig,
) -> Result<(), IndexerError> {
    let resume = config.resume_block_id;

    let header = block_store
        .get_block_header(&resume)?
        .ok_or(IndexerError::UnknownResumeBlock(resume))?;
    if ledger.get_branch_type(&resume)? != BranchType::Main {
        return Err(IndexerError::NotMainBranch(resume));
    }

    let mut height = header.height;
    while let Some(next_id) = ledger.get_block_id_for_height(height)? {
        let block = block_store
            .get_block(&next_id)?
            .ok_or(IndexerError::MissingBlock(next_id))?;
        indexer.index_transactions(&block, next_id, true);
        height += 1;
    }

    info!(
        height = indexer.latest_height(),
        block_id = %indexer.latest_block_id(),
        "finished catch-up indexing"
    );
    Ok(())
}
