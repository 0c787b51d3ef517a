//! Debounced persistence of cart snapshots.
//!
//! One background task per store watches the snapshot channel. Every change
//! re-arms a single timer; only the snapshot that survives the quiet window
//! is written. When the channel closes with a write still pending, that
//! snapshot is written before the task exits, provided the runtime is still
//! driving the task. A runtime that shuts down first cancels it.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use marketcart_core::{encode_snapshot, CartSnapshot};
use marketcart_store::Storage;

use crate::error::{CartError, Result};

/// Where and how often snapshots are written.
#[derive(Clone)]
pub(crate) struct Persister {
    storage: Arc<dyn Storage>,
    key: Arc<str>,
    debounce: Duration,
}

impl Persister {
    pub(crate) fn new(storage: Arc<dyn Storage>, key: &str, debounce: Duration) -> Self {
        Self {
            storage,
            key: Arc::from(key),
            debounce,
        }
    }

    /// Spawn the background task on the current Tokio runtime.
    ///
    /// Returns `None` outside a runtime; the store then only persists
    /// through explicit flushes.
    pub(crate) fn spawn(self, rx: watch::Receiver<CartSnapshot>) -> Option<JoinHandle<()>> {
        match Handle::try_current() {
            Ok(handle) => Some(handle.spawn(self.run(rx))),
            Err(_) => {
                tracing::warn!(
                    key = %self.key,
                    "no tokio runtime; cart changes will only be saved on explicit flush"
                );
                None
            }
        }
    }

    /// Encode and write a snapshot on the calling thread.
    pub(crate) fn write_now(&self, snapshot: &CartSnapshot) -> Result<()> {
        let blob = encode_snapshot(snapshot)?;
        self.storage.set(&self.key, &blob)?;
        tracing::debug!(key = %self.key, items = snapshot.len(), "cart saved");
        Ok(())
    }

    async fn run(self, mut rx: watch::Receiver<CartSnapshot>) {
        loop {
            if rx.changed().await.is_err() {
                break;
            }

            let closed = self.settle(&mut rx).await;
            let snapshot = rx.borrow_and_update().clone();
            self.write_blocking(snapshot).await;

            if closed {
                break;
            }
        }
        tracing::debug!(key = %self.key, "cart persister stopped");
    }

    /// Wait until no change has arrived for a full debounce window.
    ///
    /// Returns `true` when the channel closed while waiting.
    async fn settle(&self, rx: &mut watch::Receiver<CartSnapshot>) -> bool {
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        return true;
                    }
                }
                _ = tokio::time::sleep(self.debounce) => return false,
            }
        }
    }

    async fn write_blocking(&self, snapshot: CartSnapshot) {
        let this = self.clone();
        let outcome = tokio::task::spawn_blocking(move || this.write_now(&snapshot))
            .await
            .map_err(|e| CartError::Persister(e.to_string()))
            .and_then(|written| written);

        if let Err(e) = outcome {
            // In-memory state stays authoritative; the next change retries.
            tracing::error!(key = %self.key, error = %e, "failed to save cart");
        }
    }
}
