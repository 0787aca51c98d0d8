//! Creating, renaming and removing hosted repositories.
//!
//! Each operation touches the record store and the filesystem one after the
//! other. There is no transaction spanning both, so every step that can leave
//! them out of step has a compensating action:
//!
//! | operation | step that fails          | compensation                    |
//! |-----------|--------------------------|---------------------------------|
//! | create    | `init --bare`            | delete the record               |
//! | create    | export marker            | remove the directory and record |
//! | rename    | store update             | rename the directory back       |
//! | publish   | store update             | undo the marker change          |
//!
//! A crash between steps can still leave the two diverged.

use std::io;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::error::{RepositoryError, RepositoryResult};
use super::types::{is_valid_name, BareLocation, Repository, ValidationError};
use crate::fs::Filesystem;
use crate::plumbing::{Plumbing, Subcommand};
use crate::store::RecordStore;

/// Owns the lifecycle of hosted repositories.
///
/// Collaborators are injected at construction; nothing is read from global
/// state.
#[derive(Clone)]
pub struct RepositoryManager {
    pub(super) store: Arc<dyn RecordStore>,
    fs: Arc<dyn Filesystem>,
    plumbing: Arc<dyn Plumbing>,
    location: BareLocation,
}

impl RepositoryManager {
    pub fn new(
        store: Arc<dyn RecordStore>,
        fs: Arc<dyn Filesystem>,
        plumbing: Arc<dyn Plumbing>,
        location: BareLocation,
    ) -> Self {
        Self {
            store,
            fs,
            plumbing,
            location,
        }
    }

    pub fn location(&self) -> &BareLocation {
        &self.location
    }

    /// Validate, persist, and materialize a new bare repository.
    #[instrument(skip(self, users))]
    pub fn create(&self, name: &str, users: Vec<String>, is_public: bool) -> RepositoryResult<Repository> {
        let record = Repository::new(name, users, is_public);
        record.validate()?;

        self.store.insert(&record)?;

        if let Err(err) = self.materialize(&record) {
            warn!(error = %err, "bare repository creation failed, discarding record");
            if let Err(e) = self.store.remove(name) {
                warn!(error = %e, "could not discard repository record");
            }
            return Err(err);
        }

        info!("repository created");
        Ok(record)
    }

    fn materialize(&self, record: &Repository) -> RepositoryResult<()> {
        self.plumbing
            .run(&record.name, Subcommand::InitBare, &[])
            .map_err(|e| RepositoryError::bare_creation(&record.name, e))?;

        if record.is_public {
            let marker = self.location.export_marker_for(&record.name);
            if let Err(source) = self.fs.create_file(&marker) {
                let path = self.location.path_for(&record.name);
                if let Err(e) = self.fs.remove_all(&path) {
                    warn!(path = %path.display(), error = %e, "could not remove bare directory");
                }
                return Err(RepositoryError::Filesystem { path: marker, source });
            }
        }
        Ok(())
    }

    /// Delete the record, then the bare directory.
    #[instrument(skip(self))]
    pub fn remove(&self, name: &str) -> RepositoryResult<()> {
        self.lookup(name).map_err(RepositoryError::removal_failed)?;
        self.store.remove(name).map_err(RepositoryError::removal_failed)?;

        let path = self.location.path_for(name);
        self.fs.remove_all(&path).map_err(|source| {
            RepositoryError::removal_failed(RepositoryError::Filesystem { path, source })
        })?;

        info!("repository removed");
        Ok(())
    }

    /// Move the bare directory, then the record, to `new_name`.
    #[instrument(skip(self))]
    pub fn rename(&self, old_name: &str, new_name: &str) -> RepositoryResult<()> {
        let mut record = self.lookup(old_name)?;
        if !is_valid_name(new_name) {
            return Err(ValidationError::InvalidName.into());
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.exists(new_name)? {
            return Err(RepositoryError::Conflict(new_name.to_string()));
        }

        let from = self.location.path_for(old_name);
        let to = self.location.path_for(new_name);
        self.fs.rename(&from, &to).map_err(|source| RepositoryError::Filesystem {
            path: from.clone(),
            source,
        })?;

        record.name = new_name.to_string();
        if let Err(err) = self.store.replace(old_name, &record) {
            warn!(error = %err, "record update failed, moving directory back");
            if let Err(e) = self.fs.rename(&to, &from) {
                warn!(error = %e, "could not move bare directory back");
            }
            return Err(err.into());
        }

        info!("repository renamed");
        Ok(())
    }

    pub fn get(&self, name: &str) -> RepositoryResult<Repository> {
        self.lookup(name)
    }

    pub fn exists(&self, name: &str) -> RepositoryResult<bool> {
        match self.lookup(name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch a record. A name that could not have been created is reported
    /// as missing before it reaches the store or a path.
    pub(super) fn lookup(&self, name: &str) -> RepositoryResult<Repository> {
        if !is_valid_name(name) {
            return Err(RepositoryError::NotFound(name.to_string()));
        }
        Ok(self.store.get(name)?)
    }

    /// Expose or hide the repository on the anonymous read-only transport.
    #[instrument(skip(self))]
    pub fn set_public(&self, name: &str, is_public: bool) -> RepositoryResult<Repository> {
        let mut record = self.lookup(name)?;
        if record.is_public == is_public {
            return Ok(record);
        }

        let marker = self.location.export_marker_for(name);
        self.toggle_marker(&marker, is_public)
            .map_err(|source| RepositoryError::Filesystem {
                path: marker.clone(),
                source,
            })?;

        record.is_public = is_public;
        if let Err(err) = self.store.replace(name, &record) {
            if let Err(e) = self.toggle_marker(&marker, !is_public) {
                warn!(error = %e, "could not restore export marker");
            }
            return Err(err.into());
        }
        Ok(record)
    }

    fn toggle_marker(&self, marker: &std::path::Path, present: bool) -> io::Result<()> {
        if present {
            self.fs.create_file(marker)
        } else {
            match self.fs.remove_file(marker) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            }
        }
    }
}
