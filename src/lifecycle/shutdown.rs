//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Long-running tasks subscribe; any holder can trigger. The server's accept
/// loop and the telemetry flush both key off the same signal so spans opened
/// before the trigger still drain.
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

    /// Wait for Ctrl+C and trigger shutdown.
    pub async fn on_signal(&self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            return;
        }
        tracing::info!("shutdown signal received");
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_reaches_all_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();

        shutdown.trigger();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn subscribe_after_trigger_waits() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let mut late = shutdown.subscribe();

        let result =
            tokio::time::timeout(std::time::Duration::from_millis(20), late.recv()).await;
        assert!(result.is_err(), "late subscriber must not see old signal");
    }
}
