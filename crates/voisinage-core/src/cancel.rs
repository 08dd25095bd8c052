//! Cooperative cancellation for long-running async operations.
//!
//! A [`CancelHandle`] flips a `watch` channel; every cloned [`Cancellation`]
//! observes it. Dropping the handle without cancelling leaves the operation
//! running to completion.

use tokio::sync::watch;

/// Sender side, owned by whoever may abandon the operation.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation to every linked [`Cancellation`].
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver side, passed into the cancellable operation.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is requested. Pends forever if the handle
    /// is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create a linked handle/signal pair.
pub fn cancellation_pair() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx })
}
