//! # Territory Poller
//!
//! Background task refreshing the territory profiles at a fixed delay.
//!
//! The first poll runs as soon as the task starts. A failed poll is logged
//! and the previous snapshot is kept until the next interval.

use crate::manager::TerritoryManager;
use crate::source::TerritorySource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running poller
pub struct PollerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the poller and wait for the task to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Territory poller task failed: {:?}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Fetch and apply one document
///
/// # Returns
/// `true` if the snapshot was replaced
pub async fn poll_once(manager: &TerritoryManager, source: &dyn TerritorySource) -> bool {
    let document = match source.fetch().await {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Territory fetch from {} failed: {}", source.describe(), e);
            return false;
        }
    };

    match manager.refresh_from_document(&document) {
        Ok(replaced) => replaced,
        Err(e) => {
            tracing::warn!("Territory document from {} rejected: {}", source.describe(), e);
            false
        }
    }
}

/// Spawn the poller on the current runtime
///
/// # Arguments
/// * `manager` - Receives each new snapshot
/// * `source` - Polled once per interval
/// * `interval` - Delay between polls
pub fn spawn_territory_poller(
    manager: Arc<TerritoryManager>,
    source: Arc<dyn TerritorySource>,
    interval: Duration,
) -> PollerHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        tracing::info!(
            "Territory poller started ({}, every {:?})",
            source.describe(),
            interval
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    poll_once(&manager, source.as_ref()).await;
                }

                _ = &mut shutdown_rx => {
                    break;
                }
            }
        }

        tracing::info!("Territory poller stopped");
    });

    PollerHandle {
        shutdown_tx: Some(shutdown_tx),
        task,
    }
}
