//! Control-plane front end.
//!
//! Relays opaque control messages from remote agents to a processing engine,
//! serves the frontend certificate and a health probe, and drains in-flight
//! requests on shutdown.

pub mod config;
pub mod engine;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::FrontendConfig;
pub use engine::{ProcessingEngine, ProcessingOutcome};
pub use error::FrontendError;
pub use health::{HealthFlag, HealthState};
pub use lifecycle::{LifecycleCoordinator, Shutdown};
