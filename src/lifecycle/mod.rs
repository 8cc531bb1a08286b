//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → engine + state → bind listener → coordinator
//!
//! Serving (coordinator.rs):
//!     mark Healthy → accept loop
//!
//! Signals (signals.rs):
//!     SIGINT (and optionally SIGTERM) → Shutdown::trigger
//!
//! Shutdown (shutdown.rs + coordinator.rs):
//!     trigger → mark Draining → stop accepting → drain (bounded) → Stopped
//! ```
//!
//! # Design Decisions
//! - Shutdown has a deadline: exceeding it is a fatal condition
//! - No transition is reversible

pub mod coordinator;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use coordinator::{LifecycleCoordinator, LifecycleError};
pub use shutdown::{Shutdown, ShutdownListener};
