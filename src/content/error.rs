//! Read-path errors.
//!
//! Failures carry the operation and its targets so the message can be shown
//! to users unchanged. A missing git executable is the exception: it is an
//! environment problem and passes through without added context.

use thiserror::Error;

use crate::plumbing::PlumbingError;

/// Result type for content retrieval.
pub type ContentResult<T> = Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    ToolNotFound(PlumbingError),

    #[error("Error when trying to obtain file {path} on ref {reference} of repository {repo} ({source}).")]
    File {
        repo: String,
        reference: String,
        path: String,
        source: PlumbingError,
    },

    #[error("Error when trying to obtain tree {path} on ref {reference} of repository {repo} ({source}).")]
    Tree {
        repo: String,
        reference: String,
        path: String,
        source: PlumbingError,
    },

    #[error("Error when trying to obtain the refs of repository {repo} ({source}).")]
    Refs { repo: String, source: PlumbingError },

    #[error("Error when trying to obtain archive for ref {reference} of repository {repo} ({source}).")]
    Archive {
        repo: String,
        reference: String,
        source: PlumbingError,
    },

    /// A reference that would be read as a command-line option.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("could not parse {what} output line {line:?}")]
    Parse { what: &'static str, line: String },

    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),
}

impl ContentError {
    /// Route a plumbing failure: missing tool passes through, everything
    /// else gets the operation context from `wrap`.
    pub(crate) fn from_plumbing(
        err: PlumbingError,
        wrap: impl FnOnce(PlumbingError) -> ContentError,
    ) -> Self {
        if err.is_tool_not_found() {
            ContentError::ToolNotFound(err)
        } else {
            wrap(err)
        }
    }

    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, ContentError::ToolNotFound(_))
    }

    /// The repository directory itself is missing.
    pub fn is_repository_missing(&self) -> bool {
        matches!(
            self,
            ContentError::File { source: PlumbingError::RepositoryNotFound { .. }, .. }
                | ContentError::Tree { source: PlumbingError::RepositoryNotFound { .. }, .. }
                | ContentError::Refs { source: PlumbingError::RepositoryNotFound { .. }, .. }
                | ContentError::Archive { source: PlumbingError::RepositoryNotFound { .. }, .. }
        )
    }
}
