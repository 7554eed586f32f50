//! Stop signal shared by the signal listener, the HTTP server and tests.

use tokio::sync::broadcast;

/// One-shot stop broadcast.
///
/// The HTTP server holds a receiver and drains in-flight requests once
/// [`Shutdown::trigger`] is called. Receivers must subscribe before the trigger
/// to see it.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop. Safe to call with nobody listening or more than once.
    pub fn trigger(&self) {
        if self.tx.send(()).is_ok() {
            tracing::debug!("Shutdown requested");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
