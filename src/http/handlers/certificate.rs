//! `/server.pem`: the configured frontend certificate, for agents to pin.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::http::server::AppState;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Always 200, whatever the health state. The body already carries the
/// trailing newline (see [`AppState::new`]).
pub async fn server_pem(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        state.certificate.clone(),
    )
}
