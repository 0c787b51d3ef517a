//! Storage trait: the abstract interface for a durable key-value slot.
//!
//! The cart keeps its whole state in one string blob under one key, so the
//! interface is deliberately small. Implementations include SQLite (durable)
//! and in-memory (for tests and ephemeral sessions).

use std::sync::Arc;

use crate::error::Result;

/// A synchronous key-value store of string blobs.
///
/// Calls may block on I/O; async callers should run them on a blocking
/// thread.
///
/// # Design Notes
///
/// - **Last write wins**: `set` replaces any previous value under the key.
/// - **Missing is not an error**: `get` on an absent key is `Ok(None)` and
///   `remove` on an absent key is `Ok(())`.
pub trait Storage: Send + Sync {
    /// Read the blob stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the blob under `key`, if any.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
