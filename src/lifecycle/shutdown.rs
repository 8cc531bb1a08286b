//! Shutdown trigger for the front end.

use tokio::sync::watch;

/// One-shot shutdown trigger.
///
/// Clones share the same trigger; every [`ShutdownListener`] wakes once it
/// fires, including listeners created afterwards.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the trigger. Later calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|fired| !std::mem::replace(fired, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once shutdown has been triggered.
    ///
    /// Also resolves if every [`Shutdown`] handle is dropped, since nothing
    /// could trigger it any more.
    pub async fn recv(&mut self) {
        let _ = self.rx.wait_for(|fired| *fired).await;
    }
}
