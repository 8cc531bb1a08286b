//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber.
///
/// `level_override` (from the command line) wins over the config file.
pub fn init_logging(config: &ObservabilityConfig, level_override: Option<&str>) {
    let default_level = level_override.unwrap_or(&config.log_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(default_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Directive applied to this crate and tower-http at the given level.
fn default_filter(level: &str) -> String {
    format!("control_frontend={level},tower_http={level},warn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let directive = default_filter("debug");
        assert_eq!(directive, "control_frontend=debug,tower_http=debug,warn");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
