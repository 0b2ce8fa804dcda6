//! Listener lifecycle and accept loop.
//!
//! # Responsibilities
//! - Own the bound socket and the single accept-loop task
//! - Guard start/stop/dispose transitions with one lifecycle lock
//! - Hand each accepted connection to the dispatcher and keep accepting
//! - Survive individual accept failures (availability over visibility)
//!
//! # Design Decisions
//! - Cooperative cancellation via a watch channel, never task abort
//! - `stop` joins the accept task before returning; dropping the socket
//!   inside the task is what releases the port, so a later `start`
//!   can re-bind the same address
//! - Swallowed accept faults are counted through the metrics interface
//! - Lifecycle misuse fails loudly to the caller; per-request failures
//!   never surface here

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::http::dispatch;
use crate::observability::metrics;

/// Lifecycle errors for the server API.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The bind address did not parse.
    #[error("invalid bind address `{addr}`: {source}")]
    Addr {
        addr: String,
        source: std::net::AddrParseError,
    },

    /// Binding the socket failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The server has been disposed and is permanently stopped.
    #[error("server has been disposed")]
    Disposed,
}

/// The transform server: an explicitly constructed, explicitly owned
/// listener with a start/stop/dispose lifecycle.
///
/// Invariant: `disposed` implies not running; every transition happens
/// under the lifecycle mutex.
pub struct Server {
    config: Arc<ServerConfig>,
    lifecycle: Mutex<Lifecycle>,
}

/// Lifecycle flags plus the handles owned while running.
struct Lifecycle {
    running: Option<AcceptLoop>,
    disposed: bool,
}

/// Handles owned for the lifetime of one accept loop.
struct AcceptLoop {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            lifecycle: Mutex::new(Lifecycle {
                running: None,
                disposed: false,
            }),
        }
    }

    /// Bind `addr` and spawn the accept loop.
    ///
    /// Idempotent while running: a second call is a no-op that returns
    /// the address already bound. Port 0 binds an ephemeral port; the
    /// actual address is returned. Fails with [`ServerError::Disposed`]
    /// after [`Server::dispose`].
    pub async fn start(&self, addr: &str) -> Result<SocketAddr, ServerError> {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.disposed {
            return Err(ServerError::Disposed);
        }
        if let Some(running) = &lifecycle.running {
            return Ok(running.local_addr);
        }

        let addr: SocketAddr = addr.parse().map_err(|source| ServerError::Addr {
            addr: addr.to_string(),
            source,
        })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(accept_loop(listener, shutdown_rx, Arc::clone(&self.config)));

        tracing::info!(address = %local_addr, "Listener started");
        lifecycle.running = Some(AcceptLoop {
            local_addr,
            shutdown,
            task,
        });
        Ok(local_addr)
    }

    /// Stop accepting and join the accept loop. No-op when not running.
    ///
    /// In-flight requests are not cancelled; they run to completion in
    /// their own tasks.
    pub async fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        stop_locked(&mut lifecycle).await;
    }

    /// Stop permanently. Idempotent; every later `start` fails.
    pub async fn dispose(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        stop_locked(&mut lifecycle).await;
        lifecycle.disposed = true;
    }

    /// Address currently bound, if running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.lifecycle.lock().await.running.as_ref().map(|r| r.local_addr)
    }
}

async fn stop_locked(lifecycle: &mut Lifecycle) {
    let Some(running) = lifecycle.running.take() else {
        return;
    };
    let _ = running.shutdown.send(true);
    if let Err(e) = running.task.await {
        tracing::error!(error = %e, "Accept loop failed to join cleanly");
    }
    tracing::info!(address = %running.local_addr, "Listener stopped");
}

/// The accept loop. Owns the socket; dropping it on exit releases the
/// port.
///
/// Cancellation arrives through the watch channel and exits the loop
/// cleanly. Any other failure of a single accept iteration is counted
/// and the loop continues: one bad connection must not kill the server.
async fn accept_loop(
    listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
    config: Arc<ServerConfig>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                tracing::debug!("Accept loop exiting on shutdown signal");
                return;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::trace!(peer_addr = %peer, "Connection accepted");
                    let config = Arc::clone(&config);
                    tokio::spawn(dispatch::serve_connection(stream, config));
                }
                Err(e) => {
                    metrics::record_accept_fault();
                    tracing::warn!(error = %e, "Accept failed; continuing");
                }
            }
        }
    }
}
