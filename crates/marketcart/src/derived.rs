//! Derived read channels.

use std::fmt;

use tokio::sync::watch;

use marketcart_core::CartSnapshot;

use crate::error::{CartError, Result};

/// A read channel whose value is computed from each cart snapshot.
///
/// Nothing is cached: the value is recomputed from the snapshot it is read
/// from, so it can never disagree with the line items.
pub struct Derived<T> {
    rx: watch::Receiver<CartSnapshot>,
    project: fn(&CartSnapshot) -> T,
}

impl<T> Derived<T> {
    pub(crate) fn new(rx: watch::Receiver<CartSnapshot>, project: fn(&CartSnapshot) -> T) -> Self {
        Self { rx, project }
    }

    /// The value for the latest snapshot.
    pub fn get(&self) -> T {
        (self.project)(&self.rx.borrow())
    }

    /// The value for the latest snapshot, marking it as seen.
    pub fn get_and_update(&mut self) -> T {
        (self.project)(&self.rx.borrow_and_update())
    }

    /// Whether a snapshot arrived since the last one marked seen.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next snapshot and return its value.
    ///
    /// Every published snapshot wakes this, even when the derived value is
    /// the same as before. Fails with [`CartError::Closed`] once the store is
    /// gone.
    pub async fn changed(&mut self) -> Result<T> {
        self.rx.changed().await.map_err(|_| CartError::Closed)?;
        Ok(self.get_and_update())
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            project: self.project,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derived").field(&self.get()).finish()
    }
}
