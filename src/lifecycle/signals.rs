//! OS signal handling.
//!
//! SIGINT (Ctrl-C) always starts a graceful drain. SIGTERM does too when
//! `lifecycle.drain_on_terminate` is set; otherwise it keeps its default
//! disposition.

use crate::lifecycle::shutdown::Shutdown;

/// Wait for a shutdown signal, then fire `shutdown`.
pub async fn listen(shutdown: Shutdown, drain_on_terminate: bool) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        if drain_on_terminate {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    result?;
                    tracing::info!("Received SIGINT, initiating shutdown");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating shutdown");
                }
            }
            shutdown.trigger();
            return Ok(());
        }
    }

    #[cfg(not(unix))]
    let _ = drain_on_terminate;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received SIGINT, initiating shutdown");
    shutdown.trigger();
    Ok(())
}
