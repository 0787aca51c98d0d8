//! Record store for repository documents.
//!
//! The store is keyed by repository name. Callers only see the
//! [`RecordStore`] contract; two implementations are provided:
//!
//! - [`MemoryStore`] keeps documents in a map (tests, embedding)
//! - [`DirectoryStore`] keeps one JSON document per repository on disk

mod directory;
mod memory;

use thiserror::Error;

use crate::repository::Repository;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// no document under this key
    #[error("record not found: {0}")]
    NotFound(String),

    /// a document already exists under this key
    #[error("record already exists: {0}")]
    Duplicate(String),

    /// the key cannot name a document
    #[error("invalid record name: {0}")]
    InvalidName(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate(_))
    }
}

/// Key-based access to repository documents.
pub trait RecordStore: Send + Sync {
    /// Fetch the document stored under `name`.
    fn get(&self, name: &str) -> StoreResult<Repository>;

    /// Insert a new document keyed by `record.name`.
    fn insert(&self, record: &Repository) -> StoreResult<()>;

    /// Replace the document stored under `name` with `record`.
    ///
    /// When `record.name` differs from `name` the document moves to the new
    /// key; the new key must not be taken.
    fn replace(&self, name: &str, record: &Repository) -> StoreResult<()>;

    /// Delete the document stored under `name`.
    fn remove(&self, name: &str) -> StoreResult<()>;
}
