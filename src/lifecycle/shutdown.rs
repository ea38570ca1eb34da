//! Shutdown coordination for the edge.

use tokio::sync::broadcast;

use crate::lifecycle::signals::wait_for_termination;

/// Coordinator for graceful shutdown.
///
/// The HTTP server and any background task subscribe; one `trigger` stops
/// them all.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of subscribers still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Trigger shutdown when SIGINT or SIGTERM arrives.
    pub fn trigger_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            match wait_for_termination().await {
                Ok(signal) => {
                    tracing::info!(%signal, "Termination signal received");
                    shutdown.trigger();
                }
                Err(e) => tracing::error!(error = %e, "Failed to install signal handlers"),
            }
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
