//! Serve loop and graceful drain tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use control_frontend::config::ServerTimeouts;
use control_frontend::engine::ProcessingEngine;
use control_frontend::health::{HealthFlag, HealthState};
use control_frontend::http::{build_router, AppState, ControlSettings};
use control_frontend::lifecycle::{LifecycleCoordinator, LifecycleError, Shutdown};

mod common;

struct Running {
    addr: SocketAddr,
    health: HealthFlag,
    shutdown: Shutdown,
    server: JoinHandle<Result<(), LifecycleError>>,
}

async fn start(engine: Arc<dyn ProcessingEngine>, drain: Duration) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let health = HealthFlag::new();
    let timeouts = ServerTimeouts {
        drain,
        ..ServerTimeouts::default()
    };
    let state = AppState::new(health.clone(), "CERTDATA", engine, ControlSettings::default());
    let router = build_router(state, timeouts.write);

    let shutdown = Shutdown::new();
    let coordinator = LifecycleCoordinator::new(health.clone(), timeouts);
    assert_eq!(coordinator.health().state(), HealthState::Starting);

    let server = tokio::spawn(coordinator.serve(listener, router, shutdown.subscribe()));
    common::wait_until_healthy(addr).await;

    Running {
        addr,
        health,
        shutdown,
        server,
    }
}

#[tokio::test]
async fn serves_until_shutdown_then_exits_cleanly() {
    let running = start(common::delay_engine(Duration::ZERO), Duration::from_secs(5)).await;
    assert_eq!(running.health.state(), HealthState::Healthy);

    let res = common::client()
        .post(format!("http://{}/control", running.addr))
        .body("ping")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ping");

    running.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), running.server)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(running.health.state(), HealthState::Draining);
}

#[tokio::test]
async fn in_flight_request_finishes_during_drain() {
    let running = start(
        common::delay_engine(Duration::from_millis(500)),
        Duration::from_secs(5),
    )
    .await;

    let url = format!("http://{}/control", running.addr);
    let in_flight = tokio::spawn(async move {
        common::client().post(url).body("payload").send().await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    running.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(running.health.state(), HealthState::Draining);

    let res = in_flight.await.unwrap().unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "payload");

    let result = tokio::time::timeout(Duration::from_secs(5), running.server)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
    // Draining never reverts.
    assert_eq!(running.health.state(), HealthState::Draining);
}

#[tokio::test]
async fn drain_timeout_is_fatal() {
    let running = start(
        common::delay_engine(Duration::from_secs(30)),
        Duration::from_millis(200),
    )
    .await;

    let url = format!("http://{}/control", running.addr);
    let _stuck = tokio::spawn(async move { common::client().post(url).body("x").send().await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    running.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), running.server)
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(result, Err(LifecycleError::DrainTimeout(d)) if d == Duration::from_millis(200)));
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn new_connections_refused_after_shutdown() {
    let running = start(common::delay_engine(Duration::ZERO), Duration::from_secs(5)).await;

    running.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), running.server)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let res = common::client()
        .get(format!("http://{}/healthz", running.addr))
        .send()
        .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn slow_control_does_not_block_healthz() {
    let running = start(
        common::delay_engine(Duration::from_secs(2)),
        Duration::from_secs(5),
    )
    .await;

    let url = format!("http://{}/control", running.addr);
    let slow = tokio::spawn(async move { common::client().post(url).body("x").send().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    let res = common::client()
        .get(format!("http://{}/healthz", running.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);
    assert!(started.elapsed() < Duration::from_secs(1));

    assert_eq!(slow.await.unwrap().unwrap().status(), 200);
    running.shutdown.trigger();
    running.server.await.unwrap().unwrap();
}
