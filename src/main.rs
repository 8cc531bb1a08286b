//! Control-plane front end.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                   FRONT END                       │
//!   Agent request    │  ┌────────────┐   ┌─────────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│ request id │──▶│ request_log │──▶│ dispatch │  │
//!                    │  └────────────┘   └─────────────┘   └────┬─────┘  │
//!                    │          ┌────────────────┬──────────────┤        │
//!                    │          ▼                ▼              ▼        │
//!                    │     /healthz         /server.pem     /control ────┼──▶ processing
//!                    │   (HealthFlag)      (certificate)                 │     engine
//!                    │                                                   │
//!                    │  lifecycle: Starting → Healthy → Draining → Stop  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use control_frontend::config::load_config;
use control_frontend::lifecycle::{signals, startup, Shutdown};
use control_frontend::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "control-frontend")]
#[command(about = "Front end relaying agent control messages to the processing engine", long_about = None)]
struct Cli {
    /// The configuration file.
    config: PathBuf,

    /// Log level, overriding the config file (RUST_LOG still wins).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from this file, so failures here go to stderr.
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("control-frontend: error: Unable to load config file: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability, cli.log_level.as_deref());
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_address = %config.listen_address(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let listener = shutdown.subscribe();
    let drain_on_terminate = config.lifecycle.drain_on_terminate;
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = signals::listen(trigger, drain_on_terminate).await {
            tracing::error!(error = %e, "Failed to install signal handler");
        }
    });

    match startup::start(config, listener).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
