//! Shutdown coordination for the gateway.
//!
//! A single flag, flipped once. Listeners created after the flip see it
//! immediately, so a server started late still stops.

use tokio::sync::watch;

/// Owner side of the shutdown flag.
pub struct Shutdown {
    flag: watch::Sender<bool>,
}

/// Waiting side of the shutdown flag, handed to the server.
#[derive(Clone)]
pub struct ShutdownListener {
    flag: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self { flag }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            flag: self.flag.subscribe(),
        }
    }

    /// Flip the flag. Later calls are no-ops.
    pub fn trigger(&self) {
        self.flag.send_if_modified(|stopping| !std::mem::replace(stopping, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    /// Resolve once shutdown is triggered, or when the owner is dropped.
    pub async fn wait(mut self) {
        let _ = self.flag.wait_for(|stopping| *stopping).await;
    }
}
