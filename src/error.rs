//! Process-terminating errors.

use axum::http::uri::InvalidUri;
use metrics_exporter_prometheus::BuildError;

use crate::config::ConfigError;
use crate::lifecycle::LifecycleError;

/// Anything that ends the process with a nonzero exit code.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("Unable to load config file: {0}")]
    Config(#[from] ConfigError),

    #[error("Unable to create processing engine: {0}")]
    Engine(#[from] InvalidUri),

    #[error("Unable to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
