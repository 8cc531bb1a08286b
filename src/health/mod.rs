//! Health subsystem.
//!
//! # Data Flow
//! ```text
//! LifecycleCoordinator
//!     → mark_healthy() before accepting
//!     → mark_draining() on shutdown
//!
//! /healthz handler
//!     → is_healthy() on every probe
//! ```
//!
//! # Design Decisions
//! - One writer (the coordinator), unbounded concurrent readers
//! - No lock: the only invariant is the current value

pub mod state;

pub use state::{HealthFlag, HealthState};
