//! Storage backend implementations.
//!
//! This module provides different storage backends:
//! - InMemoryStore: Fast, ephemeral storage for testing
//! - FileStore: JSON file-based persistent storage
//!
//! Both apply a [`WriteBatch`] under a single write lock, so a gateway
//! operation's writes become visible all at once or not at all.
//!
//! A [`FileStore`] keeps committed batches in memory until [`StorageBackend::flush`]
//! unless it was opened with [`FileStore::with_flush_on_commit`].

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key type for storage operations
pub type StorageKey = Vec<u8>;

/// Value type for storage operations
pub type StorageValue = Vec<u8>;

/// A single write inside a [`WriteBatch`]. Gateway records are never
/// deleted, so puts are the only operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair
    Put {
        /// Key
        key: StorageKey,
        /// Value
        value: StorageValue,
    },
}

/// Ordered set of writes applied atomically by [`StorageBackend::write_batch`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    operations: Vec<BatchOperation>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw put
    pub fn put(&mut self, key: impl Into<StorageKey>, value: impl Into<StorageValue>) {
        self.operations.push(BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Queue a typed put, encoding the value with bincode
    pub fn put_typed<T: Serialize>(&mut self, key: impl Into<StorageKey>, value: &T) -> Result<()> {
        let data = bincode::serialize(value)
            .map_err(|e| Error::Serialization(format!("Failed to serialize value: {}", e)))?;
        self.put(key, data);
        Ok(())
    }

    /// Queued operations
    pub fn operations(&self) -> &[BatchOperation] {
        &self.operations
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn apply_to(self, data: &mut HashMap<StorageKey, StorageValue>) {
        for op in self.operations {
            let BatchOperation::Put { key, value } = op;
            data.insert(key, value);
        }
    }
}

/// Trait for storage backends
pub trait StorageBackend: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &[u8]) -> Result<Option<StorageValue>>;

    /// List all keys with a given prefix
    fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<StorageKey>>;

    /// Apply every operation of the batch, or none of them
    fn write_batch(&self, batch: WriteBatch) -> Result<()>;

    /// Flush any pending writes to persistent storage
    fn flush(&self) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory storage backend (for testing and ephemeral use)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl StorageBackend for InMemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<StorageValue>> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        Ok(data.get(key).cloned())
    }

    fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<StorageKey>> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        Ok(data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<()> {
        let mut data = self.data.write().map_err(|_| Error::Lock)?;
        batch.apply_to(&mut data);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // In-memory store doesn't need flushing
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE-BASED STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// File-based storage backend using JSON
#[derive(Debug)]
pub struct FileStore {
    /// Base directory for storage
    base_path: PathBuf,
    /// In-memory cache
    cache: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    /// Whether cache is dirty and needs flushing
    dirty: RwLock<bool>,
    /// Write the data file on every committed batch
    flush_on_commit: bool,
}

impl FileStore {
    /// Create a new file store at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                Error::Storage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let store = Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
            dirty: RwLock::new(false),
            flush_on_commit: false,
        };

        store.load_from_disk()?;

        Ok(store)
    }

    /// Write the data file on every committed batch instead of waiting for
    /// [`StorageBackend::flush`]. Each commit then costs a full rewrite of
    /// the file.
    pub fn with_flush_on_commit(mut self, enabled: bool) -> Self {
        self.flush_on_commit = enabled;
        self
    }

    /// Whether every committed batch is written through to disk
    pub fn flushes_on_commit(&self) -> bool {
        self.flush_on_commit
    }

    fn data_file_path(&self) -> PathBuf {
        self.base_path.join("gateway.json")
    }

    fn load_from_disk(&self) -> Result<()> {
        let path = self.data_file_path();

        if !path.exists() {
            return Ok(());
        }

        let file = File::open(&path)
            .map_err(|e| Error::Storage(format!("Failed to open data file: {}", e)))?;

        let reader = BufReader::new(file);

        // Hex-encoded keys and values
        let data: HashMap<String, String> = serde_json::from_reader(reader)
            .map_err(|e| Error::Deserialization(format!("Failed to parse data file: {}", e)))?;

        let mut cache = self.cache.write().map_err(|_| Error::Lock)?;

        for (key_hex, value_hex) in data {
            let key = hex::decode(&key_hex)
                .map_err(|e| Error::Deserialization(format!("Invalid key in storage: {}", e)))?;
            let value = hex::decode(&value_hex)
                .map_err(|e| Error::Deserialization(format!("Invalid value in storage: {}", e)))?;
            cache.insert(key, value);
        }

        Ok(())
    }

    fn save_to_disk(&self) -> Result<()> {
        let cache = self.cache.read().map_err(|_| Error::Lock)?;

        let data: HashMap<String, String> = cache
            .iter()
            .map(|(k, v)| (hex::encode(k), hex::encode(v)))
            .collect();

        // Write a sibling file, then rename over the old one
        let path = self.data_file_path();
        let tmp_path = path.with_extension("json.tmp");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| Error::Storage(format!("Failed to open data file for writing: {}", e)))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &data)
            .map_err(|e| Error::Serialization(format!("Failed to write data file: {}", e)))?;

        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to replace data file: {}", e)))?;

        let mut dirty = self.dirty.write().map_err(|_| Error::Lock)?;
        *dirty = false;

        Ok(())
    }

    fn mark_dirty(&self) -> Result<()> {
        let mut dirty = self.dirty.write().map_err(|_| Error::Lock)?;
        *dirty = true;
        Ok(())
    }
}

impl StorageBackend for FileStore {
    fn get(&self, key: &[u8]) -> Result<Option<StorageValue>> {
        let cache = self.cache.read().map_err(|_| Error::Lock)?;
        Ok(cache.get(key).cloned())
    }

    fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<StorageKey>> {
        let cache = self.cache.read().map_err(|_| Error::Lock)?;
        Ok(cache
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        {
            let mut cache = self.cache.write().map_err(|_| Error::Lock)?;
            batch.apply_to(&mut cache);
        }
        self.mark_dirty()?;
        if self.flush_on_commit {
            self.save_to_disk()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let dirty = *self.dirty.read().map_err(|_| Error::Lock)?;
        if dirty {
            self.save_to_disk()?;
        }
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Attempt to flush on drop
        let _ = self.flush();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TYPED STORE WRAPPER
// ═══════════════════════════════════════════════════════════════════════════════

/// Type-safe wrapper around a storage backend
pub struct TypedStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> TypedStore<B> {
    /// Create a new typed store
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get a typed value
    pub fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.backend.get(key)? {
            Some(data) => {
                let value = bincode::deserialize(&data).map_err(|e| {
                    Error::Deserialization(format!("Failed to deserialize value: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// List keys with prefix
    pub fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<StorageKey>> {
        self.backend.list_prefix(prefix)
    }

    /// Commit a batch atomically
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.backend.write_batch(batch)
    }

    /// Flush pending writes
    pub fn flush(&self) -> Result<()> {
        self.backend.flush()
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PREFIXES
// ═══════════════════════════════════════════════════════════════════════════════

/// Key prefixes for the gateway's tables
pub mod prefixes {
    /// Deposit table, keyed by transaction hash
    pub const DEPOSIT: &[u8] = b"dep:";
    /// Validator set, keyed by account
    pub const VALIDATOR: &[u8] = b"val:";
    /// Attestation table, keyed by transaction hash then account
    pub const ATTESTATION: &[u8] = b"att:";
    /// Balance table, keyed by account
    pub const BALANCE: &[u8] = b"bal:";
    /// Scalar values
    pub const CONFIG: &[u8] = b"cfg:";
}

/// Create a key with a prefix
pub fn make_key(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(prefix.len() + key.len());
    result.extend_from_slice(prefix);
    result.extend_from_slice(key);
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
