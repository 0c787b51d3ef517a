//! Test fixtures and helpers.
//!
//! Instrumented storages and common setup code for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use marketcart::{CartConfig, CartStore};
use marketcart_core::Product;
use marketcart_store::{MemoryStorage, Result, Storage, StorageError};

/// Memory storage that records every write.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    inner: MemoryStorage,
    reads: AtomicUsize,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStorage {
    /// Create an empty recording storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording storage with one blob already in place.
    pub fn with_entry(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStorage::with_entry(key, value),
            ..Self::default()
        }
    }

    /// Number of `get` calls so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| w.len()).unwrap_or(0)
    }

    /// The most recent blob written under `key`.
    pub fn last_written(&self, key: &str) -> Option<String> {
        let writes = self.writes.lock().ok()?;
        writes
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl Storage for RecordingStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)?;
        self.writes
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

/// Storage whose reads and writes can be made to fail.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    attempted_writes: AtomicUsize,
}

impl FailingStorage {
    /// Storage that fails every call.
    pub fn broken() -> Self {
        let storage = Self::default();
        storage.set_fail_reads(true);
        storage.set_fail_writes(true);
        storage
    }

    /// Storage whose writes fail, as when the quota is exhausted.
    pub fn read_only() -> Self {
        let storage = Self::default();
        storage.set_fail_writes(true);
        storage
    }

    /// Toggle read failures.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Toggle write failures.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `set` calls, failed or not.
    pub fn attempted_writes(&self) -> usize {
        self.attempted_writes.load(Ordering::SeqCst)
    }
}

impl Storage for FailingStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.attempted_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

/// A recording storage plus the config stores are opened with.
pub struct TestFixture {
    pub storage: Arc<RecordingStorage>,
    pub config: CartConfig,
}

impl TestFixture {
    /// Create a fixture with the default config.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RecordingStorage::new()),
            config: CartConfig::default(),
        }
    }

    /// Create a fixture with a custom debounce window.
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            config: CartConfig::default().with_persist_debounce(debounce),
            ..Self::new()
        }
    }

    /// Open a store over the fixture's storage.
    ///
    /// Opening again after the previous store saved simulates a reload.
    pub fn open(&self) -> CartStore {
        CartStore::open(Arc::clone(&self.storage), self.config.clone())
    }

    /// The blob currently stored under the fixture's key.
    pub fn stored_blob(&self) -> Option<String> {
        self.storage.get(&self.config.storage_key).ok().flatten()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A few catalog products with distinct ids and display fields.
pub fn sample_catalog() -> Vec<Product> {
    vec![
        Product::new("lamp-01", 39.0, 1)
            .name("Desk Lamp")
            .description("Adjustable arm, warm light")
            .seller("seller-ana")
            .image_media_id("media-lamp-a")
            .image_url("https://cdn.example.test/lamp.png"),
        Product::new("mug-02", 7.5, 2)
            .name("Ceramic Mug")
            .description("350 ml")
            .seller("seller-bo"),
        Product::new("rug-03", 120.0, 1)
            .name("Wool Rug")
            .seller("seller-ana")
            .image_media_id("media-rug-a")
            .image_media_id("media-rug-b"),
    ]
}
