//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the front end.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the control front end.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FrontendConfig {
    /// Listener and certificate settings.
    pub frontend: ListenerConfig,

    /// Server timeout configuration.
    pub timeouts: TimeoutConfig,

    /// `/control` endpoint settings.
    pub control: ControlConfig,

    /// Processing engine the control payloads are relayed to.
    pub engine: EngineConfig,

    /// Shutdown behaviour.
    pub lifecycle: LifecycleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl FrontendConfig {
    /// The socket address string the listener binds to.
    pub fn listen_address(&self) -> String {
        self.frontend.listen_address()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Bind port.
    pub bind_port: u16,

    /// Frontend certificate (PEM text) served on `/server.pem`.
    pub certificate: Option<String>,

    /// File to read the certificate from when `certificate` is not inline.
    pub certificate_path: Option<String>,
}

impl ListenerConfig {
    pub fn listen_address(&self) -> String {
        // IPv6 literals need brackets in a socket address.
        if self.bind_address.contains(':') {
            format!("[{}]:{}", self.bind_address, self.bind_port)
        } else {
            format!("{}:{}", self.bind_address, self.bind_port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 8000,
            certificate: None,
            certificate_path: None,
        }
    }
}

/// Timeout configuration, in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed to read a request body.
    pub read_secs: u64,

    /// Time allowed to produce a complete response.
    pub write_secs: u64,

    /// Time an idle keep-alive connection is held open.
    pub idle_secs: u64,

    /// Bound on the graceful drain after a shutdown signal.
    pub drain_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 5,
            write_secs: 10,
            idle_secs: 15,
            drain_secs: 30,
        }
    }
}

/// Resolved server timeouts.
///
/// Kept separate from [`TimeoutConfig`] so callers (tests in particular) can
/// use sub-second bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimeouts {
    pub read: Duration,
    pub write: Duration,
    pub idle: Duration,
    pub drain: Duration,
}

impl From<&TimeoutConfig> for ServerTimeouts {
    fn from(config: &TimeoutConfig) -> Self {
        Self {
            read: Duration::from_secs(config.read_secs),
            write: Duration::from_secs(config.write_secs),
            idle: Duration::from_secs(config.idle_secs),
            drain: Duration::from_secs(config.drain_secs),
        }
    }
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

/// `/control` endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControlConfig {
    /// Largest accepted request body. Unset means unbounded.
    pub max_body_bytes: Option<usize>,
}

/// Upstream processing engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Absolute URI payloads are POSTed to (e.g., "http://127.0.0.1:8001/process").
    pub upstream: Option<String>,

    /// Upper bound on a single processing call, in seconds.
    pub timeout_secs: u64,

    /// Largest response body accepted from the engine.
    pub max_response_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            timeout_secs: 10,
            max_response_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Also start a graceful drain on SIGTERM (SIGINT always does).
    pub drain_on_terminate: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// "pretty" or "json".
    pub log_format: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Address the exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_server_constants() {
        let timeouts = ServerTimeouts::default();
        assert_eq!(timeouts.read, Duration::from_secs(5));
        assert_eq!(timeouts.write, Duration::from_secs(10));
        assert_eq!(timeouts.idle, Duration::from_secs(15));
        assert_eq!(timeouts.drain, Duration::from_secs(30));
    }

    #[test]
    fn minimal_config_parses() {
        let config: FrontendConfig = toml::from_str(
            r#"
            [frontend]
            bind_address = "127.0.0.1"
            bind_port = 8443
            certificate = "CERTDATA"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_address(), "127.0.0.1:8443");
        assert_eq!(config.frontend.certificate.as_deref(), Some("CERTDATA"));
        assert_eq!(config.timeouts.drain_secs, 30);
        assert!(config.control.max_body_bytes.is_none());
    }

    #[test]
    fn ipv6_listen_address_is_bracketed() {
        let listener = ListenerConfig {
            bind_address: "::1".into(),
            bind_port: 9000,
            ..Default::default()
        };
        assert_eq!(listener.listen_address(), "[::1]:9000");
    }
}
