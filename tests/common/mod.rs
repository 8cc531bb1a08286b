//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;

use control_frontend::engine::{ProcessingEngine, ProcessingOutcome, RequestContext};

/// Start a programmable processing backend on an ephemeral port.
///
/// `f` sees the request headers and payload and returns the status and body.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(HeaderMap, Bytes) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = (u16, Bytes)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().route(
        "/process",
        post(move |headers: HeaderMap, body: Bytes| {
            let f = f.clone();
            async move {
                let (status, body) = f(headers, body).await;
                (StatusCode::from_u16(status).unwrap(), body)
            }
        }),
    );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Backend that echoes "X" as "Y", asks "enrol" to enrol, and fails otherwise.
pub async fn start_scripted_upstream() -> SocketAddr {
    start_programmable_upstream(|_, body: Bytes| async move {
        match body.as_ref() {
            b"X" => (200, Bytes::from_static(b"Y")),
            b"enrol" => (406, Bytes::from_static(b"Enrolment")),
            _ => (500, Bytes::from_static(b"cannot decrypt")),
        }
    })
    .await
}

/// In-process engine that waits `delay` and then echoes the payload.
pub struct DelayEngine {
    pub delay: Duration,
}

#[async_trait]
impl ProcessingEngine for DelayEngine {
    async fn process(&self, _ctx: RequestContext, payload: Bytes) -> ProcessingOutcome {
        tokio::time::sleep(self.delay).await;
        ProcessingOutcome::Success(payload)
    }
}

pub fn delay_engine(delay: Duration) -> Arc<dyn ProcessingEngine> {
    Arc::new(DelayEngine { delay })
}

/// Client that never reuses connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll `/healthz` until it answers 204.
pub async fn wait_until_healthy(addr: SocketAddr) {
    let client = client();
    for _ in 0..50 {
        if let Ok(res) = client.get(format!("http://{addr}/healthz")).send().await {
            if res.status() == 204 {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("front end at {addr} never became healthy");
}
