//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Connection (lifecycle::coordinator)
//!     → request.rs (assign x-request-id)
//!     → middleware/request_log.rs (one access log line per request)
//!     → server.rs (exact-path dispatch, write timeout)
//!     → handlers/ (healthz, server.pem, control)
//!     → engine (control only)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, AppState, ControlSettings};
