//! Serve loop and graceful drain.
//!
//! # State Machine
//! ```text
//! Starting → Healthy     flag flipped, then the accept loop starts
//! Healthy  → Draining    shutdown signal: flag flipped, accept loop stops,
//!                        every connection told to finish (no keep-alive)
//! Draining → Stopped     all connections closed within the drain bound (Ok)
//!                        or the bound elapsed first (DrainTimeout)
//! ```
//!
//! The drain runs in its own task and reports `Stopped` back to
//! [`LifecycleCoordinator::serve`] over a oneshot channel.

use std::time::Duration;

use axum::{extract::ConnectInfo, Router};
use hyper::{body::Incoming, server::conn::http1, service::service_fn, Request};
use hyper_util::{
    rt::{TokioIo, TokioTimer},
    server::graceful::GracefulShutdown,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::config::ServerTimeouts;
use crate::health::{HealthFlag, HealthState};
use crate::lifecycle::shutdown::ShutdownListener;
use crate::net::ConnectionTracker;
use crate::observability::metrics;

/// Fatal lifecycle conditions.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Could not listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not gracefully shutdown the server: connections still open after {0:?}")]
    DrainTimeout(Duration),

    #[error("Lifecycle coordinator exited without reporting")]
    CoordinatorLost,
}

/// Bind the listening socket.
pub async fn bind(address: &str) -> Result<TcpListener, LifecycleError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| LifecycleError::Bind {
            address: address.to_string(),
            source,
        })
}

/// Owns the serve loop and drives the shutdown drain.
pub struct LifecycleCoordinator {
    health: HealthFlag,
    timeouts: ServerTimeouts,
    connections: ConnectionTracker,
}

impl LifecycleCoordinator {
    pub fn new(health: HealthFlag, timeouts: ServerTimeouts) -> Self {
        Self {
            health,
            timeouts,
            connections: ConnectionTracker::new(),
        }
    }

    pub fn health(&self) -> &HealthFlag {
        &self.health
    }

    pub fn connections(&self) -> &ConnectionTracker {
        &self.connections
    }

    /// Serve `router` on `listener` until `shutdown` fires and the drain ends.
    pub async fn serve(
        self,
        listener: TcpListener,
        router: Router,
        shutdown: ShutdownListener,
    ) -> Result<(), LifecycleError> {
        let local_addr = listener.local_addr().ok();
        let stop_accepting = CancellationToken::new();
        let (done_tx, done_rx) = oneshot::channel();

        self.health.mark_healthy();
        metrics::set_health_state(self.health.state());
        tracing::info!(address = ?local_addr, "Server is ready to handle requests");

        let accept = tokio::spawn(accept_loop(
            listener,
            router,
            self.timeouts,
            self.connections.clone(),
            stop_accepting.clone(),
        ));

        tokio::spawn(drain_on_shutdown(
            shutdown,
            self.health.clone(),
            self.connections.clone(),
            stop_accepting,
            accept,
            self.timeouts.drain,
            done_tx,
        ));

        let result = done_rx
            .await
            .unwrap_or(Err(LifecycleError::CoordinatorLost));
        if result.is_ok() {
            tracing::info!("Server stopped");
        }
        result
    }
}

async fn accept_loop(
    listener: TcpListener,
    router: Router,
    timeouts: ServerTimeouts,
    connections: ConnectionTracker,
    stop: CancellationToken,
) -> GracefulShutdown {
    let graceful = GracefulShutdown::new();

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.idle)
        .keep_alive(true);

    loop {
        let (stream, remote_addr) = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    // Usually fd exhaustion; back off instead of spinning.
                    tracing::warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    continue;
                }
            },
        };

        let guard = connections.track();
        tracing::debug!(
            connection_id = %guard.id(),
            peer_addr = %remote_addr,
            "Connection accepted"
        );

        let router = router.clone();
        let service = service_fn(move |mut request: Request<Incoming>| {
            request.extensions_mut().insert(ConnectInfo(remote_addr));
            router.clone().oneshot(request)
        });

        let connection = graceful.watch(builder.serve_connection(TokioIo::new(stream), service));
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(connection_id = %guard.id(), error = %e, "Connection error");
            }
            drop(guard);
        });
    }

    // Dropping the listener closes the socket: no new connections.
    drop(listener);
    graceful
}

async fn drain_on_shutdown(
    mut shutdown: ShutdownListener,
    health: HealthFlag,
    connections: ConnectionTracker,
    stop_accepting: CancellationToken,
    accept: JoinHandle<GracefulShutdown>,
    drain_timeout: Duration,
    done: oneshot::Sender<Result<(), LifecycleError>>,
) {
    shutdown.recv().await;
    tracing::info!("Server is shutting down...");

    health.mark_draining();
    metrics::set_health_state(HealthState::Draining);
    stop_accepting.cancel();

    let result = match accept.await {
        Ok(graceful) => {
            tracing::info!(
                active_connections = connections.active_count(),
                drain_timeout = ?drain_timeout,
                "Draining connections"
            );
            match tokio::time::timeout(drain_timeout, graceful.shutdown()).await {
                Ok(()) => Ok(()),
                Err(_) => {
                    tracing::error!(
                        active_connections = connections.active_count(),
                        "Could not gracefully shutdown the server"
                    );
                    Err(LifecycleError::DrainTimeout(drain_timeout))
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Accept loop failed");
            Err(LifecycleError::CoordinatorLost)
        }
    };

    let _ = done.send(result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_resolves_hostnames() {
        let listener = bind("localhost:0").await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn bind_failure_names_the_address() {
        let held = bind("127.0.0.1:0").await.unwrap();
        let address = held.local_addr().unwrap().to_string();

        let err = bind(&address).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Bind { .. }));
        assert!(err.to_string().starts_with(&format!("Could not listen on {address}")));
    }
}
