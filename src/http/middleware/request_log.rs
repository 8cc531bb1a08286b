//! Per-request access log.
//!
//! One `info` event per request with method, path, remote address and
//! user-agent. The event is emitted from a drop guard, so it is written even
//! when the wrapped handler never produces a response (client disconnect,
//! panic, cancelled future).

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, Method},
    middleware::Next,
    response::Response,
};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;

pub async fn request_log(request: Request, next: Next) -> Response {
    let mut entry = AccessLogEntry::new(&request);
    let response = next.run(request).await;
    entry.status = Some(response.status().as_u16());
    response
}

struct AccessLogEntry {
    method: Method,
    path: String,
    remote_addr: String,
    user_agent: String,
    request_id: Option<String>,
    started: Instant,
    status: Option<u16>,
}

impl AccessLogEntry {
    fn new(request: &Request) -> Self {
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "-".to_string());
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        Self {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            remote_addr,
            user_agent,
            request_id: request.request_id(),
            started: Instant::now(),
            status: None,
        }
    }
}

impl Drop for AccessLogEntry {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        match self.status {
            Some(status) => {
                tracing::info!(
                    method = %self.method,
                    path = %self.path,
                    remote_addr = %self.remote_addr,
                    user_agent = %self.user_agent,
                    request_id = self.request_id.as_deref().unwrap_or("-"),
                    status,
                    elapsed_ms,
                    "request"
                );
                metrics::record_request(self.method.as_str(), &self.path, status, self.started);
            }
            None => {
                tracing::info!(
                    method = %self.method,
                    path = %self.path,
                    remote_addr = %self.remote_addr,
                    user_agent = %self.user_agent,
                    request_id = self.request_id.as_deref().unwrap_or("-"),
                    elapsed_ms,
                    "request abandoned"
                );
            }
        }
    }
}
