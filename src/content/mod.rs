//! Read-only content retrieval.
//!
//! [`ContentReader`] runs plumbing commands against a bare repository and
//! turns their output into typed records. It never touches the record store.
//!
//! ```text
//!  ContentReader ──► Plumbing::run ──► stdout bytes
//!        │                                  │
//!        └──────── tree / refs parsers ◄────┘
//! ```

mod archive;
mod error;
mod quoting;
mod refs;
mod tree;

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::plumbing::{Plumbing, Subcommand};

pub use archive::{archive_args, archive_prefix, ArchiveFormat};
pub use error::{ContentError, ContentResult};
pub use quoting::{display_path, is_quoted};
pub use refs::{parse_refs, RefEntry, REF_FORMAT, REF_SORT};
pub use tree::{parse_tree, TreeEntry};

/// Ref prefix listed by [`ContentReader::get_branch`].
pub const BRANCH_PREFIX: &str = "refs/heads/";

/// Facade over the read path.
#[derive(Clone)]
pub struct ContentReader {
    plumbing: Arc<dyn Plumbing>,
}

impl ContentReader {
    pub fn new(plumbing: Arc<dyn Plumbing>) -> Self {
        Self { plumbing }
    }

    /// Raw bytes of `path` at `reference`. An empty file is a valid result.
    #[instrument(skip(self))]
    pub fn get_file_contents(&self, repo: &str, reference: &str, path: &str) -> ContentResult<Vec<u8>> {
        check_reference(reference)?;
        let object = format!("{}:{}", reference, path);
        self.plumbing
            .run(repo, Subcommand::Show, &[object])
            .map_err(|e| {
                ContentError::from_plumbing(e, |source| ContentError::File {
                    repo: repo.to_string(),
                    reference: reference.to_string(),
                    path: path.to_string(),
                    source,
                })
            })
    }

    /// Recursive listing of `path` at `reference`. A path that does not
    /// exist yields an empty listing. An empty `path` lists the whole tree.
    #[instrument(skip(self))]
    pub fn get_tree(&self, repo: &str, reference: &str, path: &str) -> ContentResult<Vec<TreeEntry>> {
        check_reference(reference)?;
        let mut args = vec!["-r".to_string(), "-l".to_string(), reference.to_string()];
        if !path.is_empty() {
            args.push("--".to_string());
            args.push(path.to_string());
        }

        let output = self
            .plumbing
            .run(repo, Subcommand::LsTree, &args)
            .map_err(|e| {
                ContentError::from_plumbing(e, |source| ContentError::Tree {
                    repo: repo.to_string(),
                    reference: reference.to_string(),
                    path: path.to_string(),
                    source,
                })
            })?;

        let entries = parse_tree(&output)?;
        debug!(entries = entries.len(), "tree listed");
        Ok(entries)
    }

    /// Branches, most recently committed first.
    #[instrument(skip(self))]
    pub fn get_branch(&self, repo: &str) -> ContentResult<Vec<RefEntry>> {
        self.get_for_each_ref(repo, BRANCH_PREFIX)
    }

    /// Refs under `pattern`, most recently committed first.
    #[instrument(skip(self))]
    pub fn get_for_each_ref(&self, repo: &str, pattern: &str) -> ContentResult<Vec<RefEntry>> {
        check_reference(pattern)?;
        let args = vec![
            format!("--sort={}", REF_SORT),
            format!("--format={}", REF_FORMAT),
            pattern.to_string(),
        ];

        let output = self
            .plumbing
            .run(repo, Subcommand::ForEachRef, &args)
            .map_err(|e| {
                ContentError::from_plumbing(e, |source| ContentError::Refs {
                    repo: repo.to_string(),
                    source,
                })
            })?;

        parse_refs(&output)
    }

    /// Archive of the tree at `reference`, bytes exactly as git produced them.
    #[instrument(skip(self))]
    pub fn get_archive(&self, repo: &str, reference: &str, format: ArchiveFormat) -> ContentResult<Vec<u8>> {
        check_reference(reference)?;
        let output = self
            .plumbing
            .run(repo, Subcommand::Archive, &archive_args(repo, reference, format))
            .map_err(|e| {
                ContentError::from_plumbing(e, |source| ContentError::Archive {
                    repo: repo.to_string(),
                    reference: reference.to_string(),
                    source,
                })
            })?;
        debug!(bytes = output.len(), "archive built");
        Ok(output)
    }
}

fn check_reference(reference: &str) -> ContentResult<()> {
    if reference.is_empty() || reference.starts_with('-') {
        return Err(ContentError::InvalidReference(reference.to_string()));
    }
    Ok(())
}
