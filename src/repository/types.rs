//! The repository record and the naming rules around it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the marker file that lets git-daemon export a repository.
pub const DAEMON_EXPORT_MARKER: &str = "git-daemon-export-ok";

/// A hosted repository as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Primary key in the store and stem of the bare directory.
    pub name: String,
    /// Users with access, in insertion order.
    #[serde(default)]
    pub users: Vec<String>,
    /// Whether the anonymous read-only transport is exposed.
    #[serde(default)]
    pub is_public: bool,
}

impl Repository {
    pub fn new(name: impl Into<String>, users: Vec<String>, is_public: bool) -> Self {
        Self {
            name: name.into(),
            users,
            is_public,
        }
    }

    /// Check the record before anything is persisted or created on disk.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_name(&self.name) {
            return Err(ValidationError::InvalidName);
        }
        if self.users.is_empty() {
            return Err(ValidationError::NoUsers);
        }
        Ok(())
    }

    /// Append each user not already present. Returns whether anything changed.
    pub fn add_users<S: AsRef<str>>(&mut self, users: &[S]) -> bool {
        let before = self.users.len();
        for user in users {
            let user = user.as_ref();
            if !self.users.iter().any(|u| u == user) {
                self.users.push(user.to_string());
            }
        }
        self.users.len() != before
    }

    /// Drop each listed user. Returns whether anything changed.
    pub fn remove_users<S: AsRef<str>>(&mut self, users: &[S]) -> bool {
        let before = self.users.len();
        self.users
            .retain(|u| !users.iter().any(|gone| gone.as_ref() == u));
        self.users.len() != before
    }
}

/// Repository names are used as directory stems and in URLs, so they are
/// limited to `[A-Za-z0-9_.+@-]`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+' | '@'))
}

/// Reasons a record is rejected before any side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidName,
    NoUsers,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => write!(f, "Validation Error: repository name is not valid"),
            Self::NoUsers => write!(
                f,
                "Validation Error: repository should have at least one user"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Resolves repository names to bare directories under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareLocation {
    root: PathBuf,
}

impl BareLocation {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<name>.git`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.git", name))
    }

    /// Path of the daemon export marker inside a repository.
    pub fn export_marker_for(&self, name: &str) -> PathBuf {
        self.path_for(name).join(DAEMON_EXPORT_MARKER)
    }
}
