//! The CartStore: single source of truth for the in-progress cart.
//!
//! The store owns the current snapshot, publishes every change through a
//! watch channel, and mirrors the cart into a durable storage slot through a
//! debounced background writer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use marketcart_core::{
    decode_snapshot, CartChange, CartLineItem, CartSnapshot, Decoded, Product, Step, Totals,
};
use marketcart_store::Storage;

use crate::derived::Derived;
use crate::error::{CartError, Result};
use crate::persist::Persister;

/// Storage key the cart blob lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Quiet window before a burst of changes is written.
pub const DEFAULT_PERSIST_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for the CartStore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key of the storage slot holding the cart blob.
    pub storage_key: String,
    /// How long the cart must stay unchanged before it is written.
    pub persist_debounce: Duration,
}

impl CartConfig {
    /// Use a different storage key (e.g. one cart per signed-in user).
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different debounce window.
    pub fn with_persist_debounce(mut self, debounce: Duration) -> Self {
        self.persist_debounce = debounce;
        self
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            persist_debounce: DEFAULT_PERSIST_DEBOUNCE,
        }
    }
}

/// The cart store.
///
/// Construct one per application and hand it to components as
/// `Arc<CartStore>`. Mutations take `&self`, apply atomically and publish a
/// new snapshot to every subscriber, including when nothing changed.
///
/// Mutations never fail. Bad input comes back as [`CartChange::Ignored`],
/// storage problems are logged, and the in-memory cart stays authoritative.
///
/// Dropping the store lets the background writer save a pending snapshot
/// only if the Tokio runtime keeps running long enough. A store dropped as
/// the runtime shuts down (for example at the end of `#[tokio::main]`) can
/// lose changes made inside the debounce window; call
/// [`CartStore::shutdown`] before exiting.
pub struct CartStore {
    /// Current snapshot; every mutation publishes through it.
    cart: watch::Sender<CartSnapshot>,
    /// Writer for the storage slot.
    persister: Persister,
    /// Background debounced writer, absent outside a Tokio runtime.
    task: Option<JoinHandle<()>>,
    /// Configuration.
    config: CartConfig,
}

impl CartStore {
    /// Open the cart stored under `config.storage_key`.
    ///
    /// A missing, unreadable or corrupt blob yields an empty cart. Call from
    /// within a Tokio runtime to get debounced background saves; elsewhere
    /// the store works but only saves on [`CartStore::flush`].
    pub fn open<S: Storage + 'static>(storage: S, config: CartConfig) -> Self {
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let initial = load(storage.as_ref(), &config.storage_key);

        let (cart, rx) = watch::channel(initial);
        let persister = Persister::new(storage, &config.storage_key, config.persist_debounce);
        let task = persister.clone().spawn(rx);

        Self {
            cart,
            persister,
            task,
            config,
        }
    }

    /// Open with the default configuration.
    pub fn with_storage<S: Storage + 'static>(storage: S) -> Self {
        Self::open(storage, CartConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Whether changes are saved in the background.
    pub fn is_persisting(&self) -> bool {
        self.task.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a product, or adjust the quantity of its line item.
    ///
    /// With `step` the quantity moves by one unit; without it, by
    /// `product.quantity`. A line item that would reach zero or fewer units
    /// is removed.
    pub fn add_or_update(&self, product: &Product, step: Option<Step>) -> CartChange {
        let change = self.apply(|cart| cart.add_or_update(product, step));
        if let CartChange::Ignored(reason) = change {
            tracing::warn!(product_id = %product.id, %reason, "product not added to cart");
        }
        change
    }

    /// Add one unit of a product already in the cart.
    pub fn increment(&self, id: &str) -> CartChange {
        self.apply(|cart| cart.step(id, Step::Increment))
    }

    /// Take one unit of a product away, removing it at zero.
    pub fn decrement(&self, id: &str) -> CartChange {
        self.apply(|cart| cart.step(id, Step::Decrement))
    }

    /// Remove a product from the cart. Removing an absent id is a no-op.
    pub fn remove(&self, id: &str) -> CartChange {
        self.apply(|cart| cart.remove(id))
    }

    /// Empty the cart, e.g. after an order is confirmed.
    pub fn clear(&self) -> CartChange {
        self.apply(CartSnapshot::cleared)
    }

    /// Replace the snapshot atomically and publish it.
    fn apply<F>(&self, f: F) -> CartChange
    where
        F: FnOnce(&CartSnapshot) -> (CartSnapshot, CartChange),
    {
        let mut change = CartChange::Unchanged;
        self.cart.send_modify(|current| {
            let (next, outcome) = f(current);
            *current = next;
            change = outcome;
        });
        tracing::trace!(?change, "cart published");
        change
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Subscribe to snapshots.
    ///
    /// The receiver holds the current snapshot immediately and is notified
    /// on every later mutation.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.cart.subscribe()
    }

    /// Subscribe to the total number of units in the cart.
    pub fn watch_total_items(&self) -> Derived<u64> {
        Derived::new(self.subscribe(), CartSnapshot::total_items)
    }

    /// Subscribe to the total price of the cart.
    pub fn watch_total_price(&self) -> Derived<f64> {
        Derived::new(self.subscribe(), CartSnapshot::total_price)
    }

    /// Subscribe to both totals.
    pub fn watch_totals(&self) -> Derived<Totals> {
        Derived::new(self.subscribe(), CartSnapshot::totals)
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.borrow().clone()
    }

    /// Current totals.
    pub fn totals(&self) -> Totals {
        self.cart.borrow().totals()
    }

    /// The line item for a product, if it is in the cart.
    pub fn line(&self, id: &str) -> Option<CartLineItem> {
        self.cart.borrow().get(id).cloned()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.cart.borrow().len()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.borrow().is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the current snapshot now, skipping the debounce window.
    ///
    /// Blocks on the storage backend.
    pub fn flush(&self) -> Result<()> {
        let snapshot = self.snapshot();
        self.persister.write_now(&snapshot)
    }

    /// Close the store, waiting for any pending background write.
    pub async fn shutdown(self) -> Result<()> {
        let CartStore { cart, task, .. } = self;
        drop(cart);

        if let Some(task) = task {
            task.await.map_err(|e| CartError::Persister(e.to_string()))?;
        }
        Ok(())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .field("items", &self.len())
            .field("persisting", &self.is_persisting())
            .finish()
    }
}

/// Read the stored cart, falling back to empty on any problem.
fn load(storage: &dyn Storage, key: &str) -> CartSnapshot {
    let blob = match storage.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return CartSnapshot::empty(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored cart; starting empty");
            return CartSnapshot::empty();
        }
    };

    match decode_snapshot(&blob) {
        Ok(Decoded {
            snapshot,
            normalization,
        }) => {
            if !normalization.is_clean() {
                tracing::warn!(
                    key,
                    dropped = normalization.dropped,
                    merged = normalization.merged,
                    "repaired stored cart records"
                );
            }
            tracing::debug!(key, items = snapshot.len(), "cart restored");
            snapshot
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable stored cart");
            CartSnapshot::empty()
        }
    }
}
