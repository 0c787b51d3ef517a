//! Error types for the cart store.
//!
//! Mutations never fail. These errors only surface from explicit
//! persistence calls (`flush`, `shutdown`) so a caller that cares about
//! durability can react.

use marketcart_core::CodecError;
use marketcart_store::StorageError;
use thiserror::Error;

/// Errors that can occur during cart store operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Snapshot could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The background persister panicked or was cancelled.
    #[error("persister task failed: {0}")]
    Persister(String),

    /// The store was dropped; no further snapshots will arrive.
    #[error("cart store closed")]
    Closed,
}

/// Result type for cart store operations.
pub type Result<T> = std::result::Result<T, CartError>;
