//! Durable storage for registered image bytes.
//!
//! The engine consults a [`BlobStore`] exactly twice per lifecycle stage:
//! `load_all` once at startup to rebuild the registry, and `append` once
//! per successful register. Entries are identified by a monotonically
//! increasing `u64` id; load order is id order, which is insertion order.
//!
//! The default backend is redb: a pure-Rust embedded key-value store with
//! ACID transactions, so an append either commits durably or fails without
//! leaving a partial entry behind.

use std::path::Path;
use std::sync::Mutex;

use bytes::Bytes;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;

/// Table holding registered image bytes, keyed by entry id.
const IMAGES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("known_images");

/// Errors from the persistence collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// Durable, ordered blob storage for registered images.
pub trait BlobStore: Send + Sync {
    /// All persisted entries in id order. Called once, at startup.
    fn load_all(&self) -> Result<Vec<(u64, Bytes)>, StoreError>;

    /// Durably append one entry and return its id. Must not expose a
    /// partially written entry on failure.
    fn append(&self, bytes: &[u8]) -> Result<u64, StoreError>;
}

/// Redb-backed store. Safe to share across threads; redb handles its own
/// locking and MVCC.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::backend(e.to_string()))?;

        // Create the table up front so a fresh database reads back as empty
        // instead of erroring on a missing table.
        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(IMAGES_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(Self { db })
    }
}

impl BlobStore for RedbStore {
    fn load_all(&self) -> Result<Vec<(u64, Bytes)>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(IMAGES_TABLE)
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let mut entries = Vec::new();
        // redb iterates in ascending key order, which is insertion order
        // for our monotonically assigned ids.
        for item in table.iter().map_err(|e| StoreError::backend(e.to_string()))? {
            let (key, value) = item.map_err(|e| StoreError::backend(e.to_string()))?;
            entries.push((key.value(), Bytes::copy_from_slice(value.value())));
        }
        Ok(entries)
    }

    fn append(&self, bytes: &[u8]) -> Result<u64, StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let id;
        {
            let mut table = write_txn
                .open_table(IMAGES_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            id = match table.last().map_err(|e| StoreError::backend(e.to_string()))? {
                Some((key, _)) => key.value() + 1,
                None => 1,
            };
            table
                .insert(id, bytes)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }

        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(id)
    }
}

/// In-memory store for tests and ephemeral runs. Ids start at 1.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store, e.g. to exercise startup load.
    pub fn with_entries(entries: Vec<Bytes>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl BlobStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<(u64, Bytes)>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("memory store poisoned"))?;
        Ok(entries
            .iter()
            .enumerate()
            .map(|(i, bytes)| (i as u64 + 1, bytes.clone()))
            .collect())
    }

    fn append(&self, bytes: &[u8]) -> Result<u64, StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("memory store poisoned"))?;
        entries.push(Bytes::copy_from_slice(bytes));
        Ok(entries.len() as u64)
    }
}
