//! Request identity.
//!
//! # Responsibilities
//! - Assign an `x-request-id` to every inbound request (UUID v4)
//! - Keep a caller-supplied ID untouched
//! - Echo the ID on the response
//!
//! # Design Decisions
//! - Request ID added as early as possible for logging
//! - The same ID is forwarded to the processing engine

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates hyphenated UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestV4;

impl MakeRequestId for MakeRequestV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().hyphenated().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Layer that stamps a request ID on requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestV4> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestV4)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Access to the request ID assigned by [`set_request_id_layer`].
pub trait RequestIdExt {
    fn request_id(&self) -> Option<String>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<String> {
        self.extensions()
            .get::<RequestId>()
            .map(|id| id.header_value())
            .or_else(|| self.headers().get(X_REQUEST_ID))
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }
}
