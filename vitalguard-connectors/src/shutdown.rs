//! Process-wide shutdown signal
//!
//! One [`ShutdownTrigger`] fans out to any number of [`Shutdown`] listeners.
//! Every loop checks its listener in its `select!`, so a single trigger stops
//! pipelines, sessions and the server alike. Dropping the trigger counts as a
//! shutdown.

use tokio::sync::watch;

/// Sending half, owned by whoever decides the process should stop
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Receiving half, cloned into every task
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl ShutdownTrigger {
    pub fn new() -> (Self, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, Shutdown { rx })
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown { rx: self.tx.subscribe() }
    }
}

impl Shutdown {
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once shutdown has been requested
    pub async fn recv(&mut self) {
        while !*self.rx.borrow_and_update() {
            // Err means the trigger is gone, which is also a shutdown
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn all_listeners_wake() {
        let (trigger, shutdown) = ShutdownTrigger::new();
        let mut a = shutdown.clone();
        let mut b = trigger.subscribe();
        assert!(!a.is_shutdown());

        trigger.trigger();
        tokio::time::timeout(Duration::from_secs(1), async {
            a.recv().await;
            b.recv().await;
        })
        .await
        .unwrap();
        assert!(shutdown.is_shutdown());
    }

    #[tokio::test]
    async fn dropped_trigger_is_shutdown() {
        let (trigger, mut shutdown) = ShutdownTrigger::new();
        drop(trigger);
        tokio::time::timeout(Duration::from_secs(1), shutdown.recv())
            .await
            .unwrap();
        assert!(shutdown.is_shutdown());
    }
}
