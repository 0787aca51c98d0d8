//! Hosted repositories: records, naming rules, lifecycle and access.

mod access;
mod error;
mod lifecycle;
mod types;
mod urls;

pub use error::{RepositoryError, RepositoryResult};
pub use lifecycle::RepositoryManager;
pub use types::{is_valid_name, BareLocation, Repository, ValidationError, DAEMON_EXPORT_MARKER};
pub use urls::{RemoteUrls, RepositoryView};
