//! Graceful shutdown trigger.

use std::sync::Arc;

use tokio::sync::Notify;

/// A cloneable trigger that asks the server to stop accepting connections.
///
/// Triggering before the server is waiting is not lost: the next wait
/// completes immediately.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    notify: Arc<Notify>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a graceful shutdown.
    pub fn trigger(&self) {
        self.notify.notify_one();
    }

    /// Wait until [`trigger`](Shutdown::trigger) is called.
    pub async fn triggered(&self) {
        self.notify.notified().await;
    }
}
