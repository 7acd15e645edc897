//! Background snapshot writer.

use crate::engine::MatchingEngine;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Periodically persists the engine, and once more on graceful shutdown.
///
/// The writer holds the engine behind an `Arc`; each tick takes a brief
/// read-view of every symbol (the snapshot capture locks each symbol only
/// for the clone) and performs the file I/O off the matching path.
pub struct SnapshotWriter {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SnapshotWriter {
    /// Spawn the writer on the current tokio runtime, ticking at the
    /// engine's configured `persist_interval`.
    #[must_use]
    pub fn spawn(engine: Arc<MatchingEngine>) -> Self {
        let (shutdown, mut stop) = watch::channel(false);
        let interval = engine.config().persist_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(interval = ?interval, "snapshot writer started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = engine.persist() {
                            error!(error = %e, "periodic snapshot failed");
                        }
                    }
                    _ = stop.changed() => break,
                }
            }
            // Final snapshot on graceful shutdown bounds the loss window.
            if let Err(e) = engine.persist() {
                error!(error = %e, "final snapshot failed");
            }
            info!("snapshot writer stopped");
        });
        Self { shutdown, handle }
    }

    /// Stop the writer, taking one final snapshot before returning.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
