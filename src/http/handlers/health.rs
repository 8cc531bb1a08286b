//! `/healthz`: 204 while serving, 503 while starting or draining.

use axum::{extract::State, http::StatusCode};

use crate::http::server::AppState;

pub async fn healthz(State(state): State<AppState>) -> StatusCode {
    if state.health.is_healthy() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
