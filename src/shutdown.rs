// src/shutdown.rs

//! Cooperative shutdown signal.
//!
//! One [`ShutdownTrigger`] (wired to Ctrl-C in the binary) and any number of
//! [`Shutdown`] receivers. Triggering is idempotent and sticky: receivers
//! created or polled afterwards observe it immediately.

use std::future::Future;

use tokio::sync::watch;
use tracing::{error, info};

use crate::errors::{Result, TaskweaveError};

#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

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
        self.tx.send_replace(true);
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

impl Shutdown {
    /// A receiver that never fires, for callers without cancellation.
    pub fn never() -> Self {
        let (_trigger, shutdown) = channel();
        shutdown
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been requested.
    ///
    /// If every trigger is dropped without firing, this never resolves.
    pub async fn triggered(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Drive `fut` to completion unless shutdown fires first.
///
/// On shutdown `fut` is dropped, which kills any task process it started,
/// and [`TaskweaveError::Cancelled`] is returned.
pub async fn cancellable<T, F>(mut shutdown: Shutdown, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;

        _ = shutdown.triggered() => {
            info!("shutdown requested; abandoning run");
            Err(TaskweaveError::Cancelled)
        }

        res = fut => res,
    }
}

/// Forward Ctrl-C to `trigger`.
pub fn spawn_ctrl_c_listener(trigger: ShutdownTrigger) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        info!("interrupt received; shutting down");
        trigger.trigger();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_wakes_all_receivers() {
        let (trigger, mut a) = channel();
        let mut b = trigger.subscribe();
        assert!(!a.is_triggered());

        let waiter = tokio::spawn(async move {
            a.triggered().await;
        });
        trigger.trigger();
        trigger.trigger();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), b.triggered())
            .await
            .unwrap();
        assert!(b.is_triggered());
    }

    #[tokio::test]
    async fn dropped_trigger_never_fires() {
        let (trigger, mut shutdown) = channel();
        drop(trigger);
        let res = tokio::time::timeout(Duration::from_millis(20), shutdown.triggered()).await;
        assert!(res.is_err());
    }
}
