//! Loopback-only web server exposing the instance's cached state and a
//! backup trigger to processes in the same pod.

mod connection;
mod error;
mod handlers;
mod router;
mod shutdown;
mod state;

pub use error::WebError;
pub use handlers::{request_backup, serve_cache};
pub use router::{build_router, PATH_CACHE, PATH_PG_BACKUP};
pub use shutdown::ShutdownManager;
pub use state::AppState;

use std::future::IntoFuture;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::server::connection::ConnectionCounter;

/// Default port of the local web server.
pub const LOCAL_PORT: u16 = 8010;

pub struct LocalWebServer {
    pub addr: SocketAddr,
    /// Populated by try_bind(), consumed by run().
    listener: Option<TcpListener>,
    state: AppState,
    shutdown: Arc<ShutdownManager>,
    drain_timeout: Duration,
}

impl LocalWebServer {
    /// Create a server for `port` on 127.0.0.1. Port 0 picks a free port at bind time.
    pub fn new(port: u16, state: AppState) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            listener: None,
            state,
            shutdown: Arc::new(ShutdownManager::new()),
            drain_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Share an existing shutdown manager, so background tasks stop together
    /// with the server.
    pub fn with_shutdown(mut self, shutdown: Arc<ShutdownManager>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Bind the loopback listener and return the actual address.
    ///
    /// The listener is kept until run() so nothing else can take the port
    /// in between.
    pub async fn try_bind(&mut self) -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.addr).await?;
        let actual_addr = listener.local_addr()?;
        self.addr = actual_addr;
        self.listener = Some(listener);
        tracing::info!("Local web server bound to {}", actual_addr);
        Ok(actual_addr)
    }

    pub fn shutdown_handle(&self) -> Arc<ShutdownManager> {
        self.shutdown.clone()
    }

    pub fn handle(&self) -> LocalWebServerHandle {
        LocalWebServerHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Serve until shutdown is requested, then wait for open connections to drain.
    ///
    /// Binds first if try_bind() has not been called.
    pub async fn run(mut self) -> std::io::Result<()> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => {
                self.try_bind().await?;
                self.listener
                    .take()
                    .ok_or_else(|| std::io::Error::other("listener missing after bind"))?
            }
        };

        tracing::info!("Starting local web server on {}", self.addr);

        let app = build_router(self.state.clone());
        let make_service = ConnectionCounter::new(app.into_make_service(), self.shutdown.clone());

        let shutdown = self.shutdown.clone();
        axum::serve(listener, make_service)
            .with_graceful_shutdown(async move {
                if let Err(e) = shutdown.wait_for_shutdown().await {
                    tracing::error!(error = %e, "signal handler failed, shutting down");
                }
            })
            .into_future()
            .await?;

        self.shutdown.wait_for_connections(self.drain_timeout).await;
        tracing::info!("Local web server stopped");

        Ok(())
    }
}

#[derive(Clone)]
pub struct LocalWebServerHandle {
    shutdown: Arc<ShutdownManager>,
}

impl LocalWebServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal_shutdown();
    }
}
