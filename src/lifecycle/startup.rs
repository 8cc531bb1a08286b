//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the processing engine and shared state from a validated config
//! - Start the metrics exporter when enabled
//! - Bind the listener and hand over to the lifecycle coordinator
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound last, so traffic only arrives once ready

use std::sync::Arc;

use crate::config::{FrontendConfig, ServerTimeouts};
use crate::engine::{ProcessingEngine, UpstreamEngine};
use crate::error::FrontendError;
use crate::health::HealthFlag;
use crate::http::{build_router, AppState};
use crate::lifecycle::coordinator::{bind, LifecycleCoordinator};
use crate::lifecycle::shutdown::ShutdownListener;
use crate::observability::metrics;

/// Run the front end with the engine described by the config.
pub async fn start(config: FrontendConfig, shutdown: ShutdownListener) -> Result<(), FrontendError> {
    let engine = UpstreamEngine::from_config(&config.engine)?;
    tracing::info!(upstream = %engine.upstream(), "Processing engine configured");

    start_with_engine(config, Arc::new(engine), shutdown).await
}

/// Run the front end with a caller-supplied engine.
pub async fn start_with_engine(
    config: FrontendConfig,
    engine: Arc<dyn ProcessingEngine>,
    shutdown: ShutdownListener,
) -> Result<(), FrontendError> {
    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let timeouts = ServerTimeouts::from(&config.timeouts);
    let health = HealthFlag::new();
    metrics::set_health_state(health.state());

    let state = AppState::from_config(&config, health.clone(), engine);
    let router = build_router(state, timeouts.write);

    let listen_address = config.listen_address();
    let listener = bind(&listen_address).await?;

    LifecycleCoordinator::new(health, timeouts)
        .serve(listener, router, shutdown)
        .await?;
    Ok(())
}
