//! Front end health state machine.
//!
//! # States
//! - Starting: listener not yet accepting
//! - Healthy: actively serving
//! - Draining: shutdown in progress
//!
//! # State Transitions
//! ```text
//! Starting → Healthy: immediately before the accept loop starts
//! Starting/Healthy → Draining: shutdown signal received (terminal)
//! ```
//!
//! # Design Decisions
//! - Single atomic scalar; readers never block
//! - Draining is terminal, nothing moves the flag back to Healthy

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Observable health of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HealthState {
    Starting = 0,
    Healthy = 1,
    Draining = 2,
}

impl HealthState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => HealthState::Starting,
            1 => HealthState::Healthy,
            _ => HealthState::Draining,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Starting => "starting",
            HealthState::Healthy => "healthy",
            HealthState::Draining => "draining",
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared health flag handed to every request handler.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct HealthFlag {
    state: Arc<AtomicU8>,
}

impl HealthFlag {
    /// Create a flag in the `Starting` state.
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(HealthState::Starting as u8)),
        }
    }

    /// Move `Starting → Healthy`. Returns false if the flag was not `Starting`.
    pub fn mark_healthy(&self) -> bool {
        self.state
            .compare_exchange(
                HealthState::Starting as u8,
                HealthState::Healthy as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Move to `Draining`. Returns true only for the call that made the transition.
    pub fn mark_draining(&self) -> bool {
        self.state.swap(HealthState::Draining as u8, Ordering::AcqRel)
            != HealthState::Draining as u8
    }

    pub fn is_healthy(&self) -> bool {
        self.state() == HealthState::Healthy
    }

    pub fn state(&self) -> HealthState {
        HealthState::from_u8(self.state.load(Ordering::Acquire))
    }
}

impl Default for HealthFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unhealthy() {
        let flag = HealthFlag::new();
        assert_eq!(flag.state(), HealthState::Starting);
        assert!(!flag.is_healthy());
    }

    #[test]
    fn healthy_then_draining() {
        let flag = HealthFlag::new();
        assert!(flag.mark_healthy());
        assert!(flag.is_healthy());

        assert!(flag.mark_draining());
        assert_eq!(flag.state(), HealthState::Draining);
        assert!(!flag.is_healthy());
    }

    #[test]
    fn draining_is_terminal() {
        let flag = HealthFlag::new();
        flag.mark_healthy();
        flag.mark_draining();

        assert!(!flag.mark_healthy());
        assert_eq!(flag.state(), HealthState::Draining);
        assert!(!flag.mark_draining(), "second drain must not report a transition");
    }

    #[test]
    fn draining_before_serving_is_allowed() {
        let flag = HealthFlag::new();
        assert!(flag.mark_draining());
        assert!(!flag.mark_healthy());
    }

    #[test]
    fn clones_share_state() {
        let flag = HealthFlag::new();
        let handler_view = flag.clone();
        flag.mark_healthy();
        assert!(handler_view.is_healthy());
    }
}
