//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → lifecycle::coordinator (accept loop)
//!     → connection.rs (id, live-connection count)
//!     → hyper HTTP/1.1 connection → HTTP layer
//! ```

pub mod connection;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
