//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read, parse & deserialize, resolve certificate file)
//!     → validation.rs (semantic checks)
//!     → FrontendConfig (validated, immutable)
//!     → handed by value to the server and lifecycle coordinator
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup and never mutated
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ControlConfig, EngineConfig, FrontendConfig, LifecycleConfig, ListenerConfig,
    ObservabilityConfig, ServerTimeouts, TimeoutConfig,
};
pub use validation::ValidationError;
