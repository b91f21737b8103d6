use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;

/// Coordinates graceful shutdown of the server and its background tasks.
pub struct ShutdownManager {
    shutdown: Arc<AtomicBool>,
    active_connections: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            active_connections: Arc::new(AtomicUsize::new(0)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Resolves on SIGINT, SIGTERM or [`signal_shutdown`](Self::signal_shutdown).
    pub async fn wait_for_shutdown(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            tokio::select! {
                _ = signal::ctrl_c() => {},
                _ = sigterm.recv() => {},
                _ = self.cancelled() => {},
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = signal::ctrl_c() => {},
                _ = self.cancelled() => {},
            }
        }

        self.shutdown.store(true, Ordering::SeqCst);
        tracing::info!("Shutting down gracefully...");
        Ok(())
    }

    /// Resolves once shutdown has been signalled, without watching OS signals.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_shutting_down() {
            return;
        }
        notified.await;
    }

    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn increment_connections(&self) {
        self.active_connections.fetch_add(1, Ordering::SeqCst);
    }

    pub fn decrement_connections(&self) {
        self.active_connections.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    pub async fn wait_for_connections(&self, timeout: Duration) {
        tracing::debug!("Waiting for {} active connections...", self.active_connections());

        let start = tokio::time::Instant::now();

        while start.elapsed() < timeout {
            if self.active_connections() == 0 {
                tracing::info!("Server stopped");
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tracing::warn!(
            "Forced shutdown after timeout ({} connections remain)",
            self.active_connections()
        );
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_after_signal() {
        let manager = Arc::new(ShutdownManager::new());
        let waiter = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.cancelled().await })
        };

        tokio::task::yield_now().await;
        manager.signal_shutdown();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() did not resolve")
            .unwrap();
        assert!(manager.is_shutting_down());
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_when_already_signalled() {
        let manager = ShutdownManager::new();
        manager.signal_shutdown();
        tokio::time::timeout(Duration::from_millis(100), manager.cancelled())
            .await
            .expect("cancelled() should not block");
    }

    #[tokio::test]
    async fn wait_for_connections_returns_when_drained() {
        let manager = ShutdownManager::new();
        manager.increment_connections();
        manager.decrement_connections();

        let started = tokio::time::Instant::now();
        manager.wait_for_connections(Duration::from_secs(5)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
