//! Persistence boundary for encrypted entries.
//!
//! The vault core knows nothing about the storage mechanics behind this
//! trait - it hands over envelopes, salts and plaintext metadata, and gets
//! the same tuple back. Serializing concurrent writes to the same entry is
//! the store's job; last-write-wins is acceptable.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use uuid::Uuid;

use super::entry::VaultEntry;

/// Errors surfaced by a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Keyed store of encrypted vault entries.
pub trait EntryStore: Send + Sync {
    /// Insert or replace an entry.
    fn put(&self, entry: VaultEntry) -> Result<(), StoreError>;

    /// Fetch one entry by id.
    fn get(&self, id: Uuid) -> Result<Option<VaultEntry>, StoreError>;

    /// All entries, ordered by service name.
    fn list_all(&self) -> Result<Vec<VaultEntry>, StoreError>;

    /// Remove an entry. Removing a missing id is a no-op.
    fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: Mutex<HashMap<Uuid, VaultEntry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryStore for MemoryEntryStore {
    fn put(&self, entry: VaultEntry) -> Result<(), StoreError> {
        lock(&self.entries).insert(entry.id, entry);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<Option<VaultEntry>, StoreError> {
        Ok(lock(&self.entries).get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<VaultEntry>, StoreError> {
        let mut entries: Vec<_> = lock(&self.entries).values().cloned().collect();
        entries.sort_by(|a, b| a.service_name.cmp(&b.service_name));
        Ok(entries)
    }

    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        lock(&self.entries).remove(&id);
        Ok(())
    }
}

/// Single-file JSON store.
///
/// The whole entry map is loaded at open and rewritten on every mutation
/// behind one lock, which serializes concurrent writers per entry.
#[derive(Debug)]
pub struct JsonEntryStore {
    path: PathBuf,
    entries: Mutex<HashMap<Uuid, VaultEntry>>,
}

impl JsonEntryStore {
    /// Open a store file, creating an empty store when the file is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let list: Vec<VaultEntry> = serde_json::from_str(&contents)?;
                list.into_iter().map(|e| (e.id, e)).collect()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<Uuid, VaultEntry>) -> Result<(), StoreError> {
        let mut list: Vec<_> = entries.values().cloned().collect();
        list.sort_by(|a, b| a.service_name.cmp(&b.service_name));
        let json = serde_json::to_string_pretty(&list)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash mid-write never truncates the vault.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EntryStore for JsonEntryStore {
    fn put(&self, entry: VaultEntry) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        entries.insert(entry.id, entry);
        self.persist(&entries)
    }

    fn get(&self, id: Uuid) -> Result<Option<VaultEntry>, StoreError> {
        Ok(lock(&self.entries).get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<VaultEntry>, StoreError> {
        let mut entries: Vec<_> = lock(&self.entries).values().cloned().collect();
        entries.sort_by(|a, b| a.service_name.cmp(&b.service_name));
        Ok(entries)
    }

    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        entries.remove(&id);
        self.persist(&entries)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
