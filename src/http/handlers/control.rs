//! `/control`: relay an opaque payload through the processing engine.
//!
//! # Outcome mapping
//! ```text
//! Success(bytes)      → 200, bytes verbatim
//! EnrolmentRequired   → 406, "Please Enrol"
//! Failure(_)          → 503, empty
//! body read failure   → 503, empty (engine not called)
//! ```

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

use crate::engine::{ProcessingOutcome, RequestContext};
use crate::http::handlers::certificate::TEXT_PLAIN;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics;

pub const ENROL_MESSAGE: &str = "Please Enrol";

pub async fn control(State(state): State<AppState>, request: Request) -> Response {
    let request_id = request.request_id();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let limit = state.control.max_body_bytes.unwrap_or(usize::MAX);
    let read = axum::body::to_bytes(request.into_body(), limit);
    let payload = match tokio::time::timeout(state.control.read_timeout, read).await {
        Ok(Ok(payload)) => payload,
        Ok(Err(e)) => {
            tracing::error!(request_id = ?request_id, error = %e, "Unable to read body");
            metrics::record_control_outcome("body_read");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        Err(_) => {
            tracing::error!(
                request_id = ?request_id,
                timeout = ?state.control.read_timeout,
                "Unable to read body: timed out"
            );
            metrics::record_control_outcome("body_read");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };

    // Cancelled when this handler returns or its future is dropped.
    let cancellation = CancellationToken::new();
    let _abandon = cancellation.clone().drop_guard();
    let ctx = RequestContext::new(request_id.clone(), remote_addr, cancellation);

    let outcome = state.engine.process(ctx, payload).await;
    metrics::record_control_outcome(outcome.kind());

    match &outcome {
        ProcessingOutcome::Failure(e) => {
            tracing::error!(request_id = ?request_id, error = %e, "Unable to process");
        }
        ProcessingOutcome::EnrolmentRequired => {
            tracing::debug!(request_id = ?request_id, "Unknown client, asking it to enrol");
        }
        ProcessingOutcome::Success(_) => {}
    }

    outcome.into_response()
}

impl IntoResponse for ProcessingOutcome {
    fn into_response(self) -> Response {
        match self {
            ProcessingOutcome::Success(body) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
            }
            ProcessingOutcome::EnrolmentRequired => {
                (StatusCode::NOT_ACCEPTABLE, ENROL_MESSAGE).into_response()
            }
            ProcessingOutcome::Failure(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}
