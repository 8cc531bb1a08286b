//! Configuration validation.
//!
//! Semantic checks run after serde has handled the syntax. Every problem is
//! reported, not just the first.

use std::net::SocketAddr;

use axum::http::Uri;

use crate::config::schema::FrontendConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Configuration does not specify a frontend certificate.")]
    MissingCertificate,

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("Configuration does not specify a processing engine upstream.")]
    MissingUpstream,

    #[error("invalid engine upstream {0:?}: expected an absolute http:// URI")]
    InvalidUpstream(String),

    #[error("unknown log format {0:?} (expected \"pretty\" or \"json\")")]
    InvalidLogFormat(String),

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &FrontendConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.frontend.certificate.is_none() {
        errors.push(ValidationError::MissingCertificate);
    }

    // Hostnames are resolved at bind time; only an empty address is rejected here.
    if config.frontend.bind_address.trim().is_empty() {
        errors.push(ValidationError::InvalidBindAddress(
            config.frontend.bind_address.clone(),
        ));
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("read_secs", timeouts.read_secs),
        ("write_secs", timeouts.write_secs),
        ("idle_secs", timeouts.idle_secs),
        ("drain_secs", timeouts.drain_secs),
        ("engine.timeout_secs", config.engine.timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    match config.engine.upstream.as_deref() {
        None => errors.push(ValidationError::MissingUpstream),
        Some(upstream) => {
            let valid = upstream
                .parse::<Uri>()
                .map(|uri| uri.scheme_str() == Some("http") && uri.authority().is_some())
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError::InvalidUpstream(upstream.to_string()));
            }
        }
    }

    let observability = &config.observability;
    if !matches!(observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::InvalidLogFormat(
            observability.log_format.clone(),
        ));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
