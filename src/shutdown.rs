//! Process-wide shutdown signal.
//!
//! A `watch` channel carrying `true` once shutdown starts. Every subscriber
//! loop holds a [`Shutdown`] and stops as soon as it flips.

use tokio::sync::watch;

/// Fires the shutdown signal.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Observes the shutdown signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // No receivers left is fine: nothing to stop.
        let _ = self.tx.send(true);
    }
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been triggered.
    ///
    /// If the trigger is dropped without firing, this never resolves.
    pub async fn wait(mut self) {
        let fired = self.rx.wait_for(|&down| down).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}
