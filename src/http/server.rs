//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared [`AppState`] from configuration
//! - Bind the three endpoints by exact path (the dispatcher)
//! - Wire up middleware (request ID, access log, write timeout)
//!
//! Serving itself (accept loop, keep-alive, drain) belongs to
//! [`crate::lifecycle::coordinator`].

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Bytes, http::StatusCode, routing::any, Router};
use tower_http::timeout::TimeoutLayer;

use crate::config::{FrontendConfig, ServerTimeouts};
use crate::engine::ProcessingEngine;
use crate::health::HealthFlag;
use crate::http::handlers::{control, healthz, server_pem};
use crate::http::middleware::request_log;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Settings the `/control` handler reads on every request.
#[derive(Debug, Clone, Copy)]
pub struct ControlSettings {
    pub read_timeout: Duration,
    pub max_body_bytes: Option<usize>,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            read_timeout: ServerTimeouts::default().read,
            max_body_bytes: None,
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub health: HealthFlag,
    /// Certificate text plus its trailing newline, ready to send.
    pub certificate: Bytes,
    pub engine: Arc<dyn ProcessingEngine>,
    pub control: ControlSettings,
}

impl AppState {
    pub fn new(
        health: HealthFlag,
        certificate: &str,
        engine: Arc<dyn ProcessingEngine>,
        control: ControlSettings,
    ) -> Self {
        Self {
            health,
            certificate: Bytes::from(format!("{certificate}\n")),
            engine,
            control,
        }
    }

    /// State for a validated configuration.
    pub fn from_config(
        config: &FrontendConfig,
        health: HealthFlag,
        engine: Arc<dyn ProcessingEngine>,
    ) -> Self {
        let control = ControlSettings {
            read_timeout: ServerTimeouts::from(&config.timeouts).read,
            max_body_bytes: config.control.max_body_bytes,
        };
        Self::new(
            health,
            config.frontend.certificate.as_deref().unwrap_or_default(),
            engine,
            control,
        )
    }
}

/// Build the router with all middleware layers.
///
/// Only `/healthz`, `/server.pem` and `/control` are served, on any method.
/// Everything else falls through to axum's 404.
pub fn build_router(state: AppState, write_timeout: Duration) -> Router {
    Router::new()
        .route("/healthz", any(healthz))
        .route("/server.pem", any(server_pem))
        .route("/control", any(control))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            write_timeout,
        ))
        .layer(axum::middleware::from_fn(request_log))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}
