//! Process lifecycle coordination.
//!
//! Both listeners and the schema auto-reload task subscribe to one
//! broadcast channel; an OS interrupt triggers it and everything winds
//! down together.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Block until the process receives an interrupt.
pub async fn wait_for_interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install interrupt handler");
        // keep serving; the process can still be killed externally
        std::future::pending::<()>().await;
    }
    tracing::info!("interrupt received");
}
