//! Lifecycle and access-control errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::plumbing::PlumbingError;
use crate::repository::types::ValidationError;
use crate::store::StoreError;

/// Result type for lifecycle and access-control operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// bad input, raised before any side effect
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A repository with this name already exists.")]
    Conflict(String),

    #[error("repository not found: {0}")]
    NotFound(String),

    /// one of the removal steps failed
    #[error("Could not remove repository: {0}")]
    RemovalFailed(#[source] Box<RepositoryError>),

    /// the git executable is missing; reported as-is
    #[error(transparent)]
    ToolNotFound(PlumbingError),

    #[error("Could not create bare repository {name} ({source}).")]
    BareCreation { name: String, source: PlumbingError },

    #[error("filesystem error on {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => RepositoryError::NotFound(name),
            StoreError::Duplicate(name) => RepositoryError::Conflict(name),
            StoreError::InvalidName(_) => RepositoryError::Validation(ValidationError::InvalidName),
            other => RepositoryError::Store(other),
        }
    }
}

impl RepositoryError {
    /// Missing record, directly or as the cause of a failed removal.
    pub fn is_not_found(&self) -> bool {
        match self {
            RepositoryError::NotFound(_) => true,
            RepositoryError::RemovalFailed(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RepositoryError::Validation(_))
    }

    pub(crate) fn removal_failed(err: impl Into<RepositoryError>) -> Self {
        RepositoryError::RemovalFailed(Box::new(err.into()))
    }

    pub(crate) fn bare_creation(name: &str, err: PlumbingError) -> Self {
        if err.is_tool_not_found() {
            RepositoryError::ToolNotFound(err)
        } else {
            RepositoryError::BareCreation {
                name: name.to_string(),
                source: err,
            }
        }
    }
}
