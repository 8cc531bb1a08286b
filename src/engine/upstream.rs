//! Engine that relays control payloads to an HTTP processing backend.
//!
//! # Responsibilities
//! - POST the opaque payload to the configured upstream
//! - Forward the request ID
//! - Map the upstream status onto a [`ProcessingOutcome`]
//!
//! # Status mapping
//! ```text
//! 200            → Success(body)
//! 406            → EnrolmentRequired
//! anything else  → Failure(Status)
//! network error  → Failure(Transport)
//! ```

use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, uri::InvalidUri, Method, Request, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::EngineConfig;
use crate::engine::{EngineError, ProcessingEngine, ProcessingOutcome, RequestContext};
use crate::http::request::X_REQUEST_ID;

pub struct UpstreamEngine {
    client: Client<HttpConnector, Body>,
    upstream: Uri,
    timeout: Duration,
    max_response_bytes: usize,
}

impl UpstreamEngine {
    pub fn new(upstream: Uri, timeout: Duration, max_response_bytes: usize) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            client,
            upstream,
            timeout,
            max_response_bytes,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, InvalidUri> {
        let upstream: Uri = config.upstream.as_deref().unwrap_or_default().parse()?;
        Ok(Self::new(
            upstream,
            Duration::from_secs(config.timeout_secs),
            config.max_response_bytes,
        ))
    }

    pub fn upstream(&self) -> &Uri {
        &self.upstream
    }

    async fn forward(
        &self,
        ctx: &RequestContext,
        payload: Bytes,
    ) -> Result<ProcessingOutcome, EngineError> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(self.upstream.clone())
            .header(header::CONTENT_TYPE, "application/octet-stream");
        if let Some(request_id) = &ctx.request_id {
            builder = builder.header(X_REQUEST_ID, request_id.as_str());
        }
        let request = builder
            .body(Body::from(payload))
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = axum::body::to_bytes(
                    Body::new(response.into_body()),
                    self.max_response_bytes,
                )
                .await
                .map_err(|e| EngineError::Transport(e.to_string()))?;
                Ok(ProcessingOutcome::Success(body))
            }
            StatusCode::NOT_ACCEPTABLE => Ok(ProcessingOutcome::EnrolmentRequired),
            status => Ok(ProcessingOutcome::Failure(EngineError::Status(
                status.as_u16(),
            ))),
        }
    }
}

#[async_trait]
impl ProcessingEngine for UpstreamEngine {
    async fn process(&self, ctx: RequestContext, payload: Bytes) -> ProcessingOutcome {
        let cancellation = ctx.cancellation.clone();

        tokio::select! {
            _ = cancellation.cancelled() => {
                tracing::debug!(request_id = ?ctx.request_id, "Upstream call abandoned");
                ProcessingOutcome::Failure(EngineError::Cancelled)
            }
            result = tokio::time::timeout(self.timeout, self.forward(&ctx, payload)) => {
                match result {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => ProcessingOutcome::Failure(e),
                    Err(_) => ProcessingOutcome::Failure(EngineError::Timeout(self.timeout)),
                }
            }
        }
    }
}
