//! # marketcart
//!
//! The client-side shopping-cart store of the marketplace: an observable
//! cart that merges line items by product, derives its totals, and mirrors
//! itself into durable storage.
//!
//! ## Overview
//!
//! - **Line items**: at most one per product id, always with a positive
//!   quantity. Decrementing to zero removes the item.
//! - **Snapshots**: every mutation publishes a new immutable snapshot to all
//!   subscribers.
//! - **Totals**: item count and price are derived from each snapshot, never
//!   stored beside it.
//! - **Persistence**: changes are written to a [`Storage`] slot after a
//!   quiet window (300 ms by default). Unreadable stored data starts an
//!   empty cart; failed writes are logged and the session carries on.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use marketcart::{CartConfig, CartStore, Product, Step};
//! use marketcart::store::SqliteStorage;
//!
//! async fn example() {
//!     let storage = SqliteStorage::open("cart.db").unwrap();
//!     let cart = Arc::new(CartStore::open(storage, CartConfig::default()));
//!
//!     // Catalog: put two mugs in the cart
//!     let mug = Product::new("mug-1", 7.5, 2).name("Mug");
//!     cart.add_or_update(&mug, None);
//!
//!     // Cart page: stepper buttons
//!     cart.add_or_update(&mug, Some(Step::Increment));
//!
//!     // Navigation badge
//!     let mut badge = cart.watch_total_items();
//!     assert_eq!(badge.get(), 3);
//!
//!     // Checkout: read the total, clear after the order is confirmed
//!     let total = cart.totals().price;
//!     assert_eq!(total, 22.5);
//!     cart.clear();
//!     assert_eq!(badge.changed().await.unwrap(), 0);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `marketcart::core` - Line items, snapshots and the cart algebra
//! - `marketcart::store` - Storage trait, SQLite and in-memory backends

pub mod cart;
pub mod derived;
pub mod error;
mod persist;

// Re-export component crates
pub use marketcart_core as core;
pub use marketcart_store as store;

// Re-export main types for convenience
pub use cart::{CartConfig, CartStore, DEFAULT_PERSIST_DEBOUNCE, DEFAULT_STORAGE_KEY};
pub use derived::Derived;
pub use error::{CartError, Result};

// Re-export commonly used core and storage types
pub use marketcart_core::{
    CartChange, CartLineItem, CartSnapshot, IgnoreReason, Product, ProductId, Step, Totals,
};
pub use marketcart_store::{MemoryStorage, SqliteStorage, Storage, StorageError};
