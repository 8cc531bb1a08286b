//! Endpoint handlers bound by the dispatcher.

pub mod certificate;
pub mod control;
pub mod health;

pub use certificate::server_pem;
pub use control::control;
pub use health::healthz;
