//! Middleware wrapping every route.

pub mod request_log;

pub use request_log::request_log;
