//! Stop signal shared by the server, the signal handler and tests.

use tokio::sync::broadcast;

/// Fan-out stop signal. Clones share one channel, so any clone can fire it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// A receiver that resolves once [`Shutdown::trigger`] fires. Subscribe
    /// before triggering; later subscribers miss the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Ask every subscriber to stop. A no-op when nobody is listening.
    pub fn trigger(&self) {
        let _ = self.notify.send(());
    }

    /// Subscribers that still hold their receiver.
    pub fn receiver_count(&self) -> usize {
        self.notify.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
