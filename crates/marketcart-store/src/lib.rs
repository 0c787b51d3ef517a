//! # marketcart store
//!
//! Durable storage slots for the marketcart cart store. Provides a
//! trait-based interface over a synchronous key-value blob store with SQLite
//! and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Storage`] - Synchronous get/set/remove of string blobs
//! - [`SqliteStorage`] - SQLite-backed durable storage
//! - [`MemoryStorage`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketcart_store::{SqliteStorage, Storage};
//!
//! let storage = SqliteStorage::open("cart.db").unwrap();
//! storage.set("cart", "[]").unwrap();
//! assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
//! ```
//!
//! ## Design Notes
//!
//! - **Synchronous**: a cart blob is small; callers that must not block
//!   move calls onto a blocking thread.
//! - **Upserts**: writing a key twice keeps only the last value.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::Storage;
