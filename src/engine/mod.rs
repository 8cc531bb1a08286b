//! Processing engine collaborator.
//!
//! # Data Flow
//! ```text
//! /control handler
//!     → RequestContext (request id, peer, cancellation)
//!     → ProcessingEngine::process(ctx, payload)
//!     → ProcessingOutcome (Success | EnrolmentRequired | Failure)
//!     → HTTP status + body
//! ```
//!
//! # Design Decisions
//! - Payloads are opaque `Bytes`; nothing here looks inside them
//! - "Unknown client" is a dedicated outcome variant, never an error message
//! - Cancellation is offered to the engine, not forced on it

pub mod upstream;

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio_util::sync::CancellationToken;

pub use upstream::UpstreamEngine;

/// Result of processing one control payload.
#[derive(Debug)]
pub enum ProcessingOutcome {
    /// Response payload to relay verbatim.
    Success(Bytes),
    /// The sender is not a known client and must enrol before retrying.
    EnrolmentRequired,
    /// Anything else that went wrong.
    Failure(EngineError),
}

impl ProcessingOutcome {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessingOutcome::Success(_) => "success",
            ProcessingOutcome::EnrolmentRequired => "enrol",
            ProcessingOutcome::Failure(_) => "failure",
        }
    }
}

/// Failure detail reported by an engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("processing timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error("engine answered with status {0}")]
    Status(u16),

    #[error("{0}")]
    Rejected(String),
}

/// Per-request context handed to the engine alongside the payload.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub remote_addr: Option<SocketAddr>,
    /// Cancelled once the originating request is abandoned.
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new(
        request_id: Option<String>,
        remote_addr: Option<SocketAddr>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            request_id,
            remote_addr,
            cancellation,
        }
    }

    /// A context that is never cancelled by a request.
    pub fn detached() -> Self {
        Self::new(None, None, CancellationToken::new())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Decrypts, authenticates and acts on control messages.
///
/// Implementations are shared across every in-flight request.
#[async_trait]
pub trait ProcessingEngine: Send + Sync + 'static {
    async fn process(&self, ctx: RequestContext, payload: Bytes) -> ProcessingOutcome;
}
