//! In-memory record store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{RecordStore, StoreError, StoreResult};
use crate::repository::Repository;

/// A [`RecordStore`] backed by a map. Thread-safe.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, Repository>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, name: &str) -> StoreResult<Repository> {
        self.records
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn insert(&self, record: &Repository) -> StoreResult<()> {
        let mut records = self.records.write();
        if records.contains_key(&record.name) {
            return Err(StoreError::Duplicate(record.name.clone()));
        }
        records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn replace(&self, name: &str, record: &Repository) -> StoreResult<()> {
        let mut records = self.records.write();
        if !records.contains_key(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        if record.name != name && records.contains_key(&record.name) {
            return Err(StoreError::Duplicate(record.name.clone()));
        }
        records.remove(name);
        records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn remove(&self, name: &str) -> StoreResult<()> {
        self.records
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
