//! JSON-file record store.
//!
//! Each repository is one document at `<dir>/<name>.json`. Writes go to a
//! temporary file in the same directory which is then persisted over the
//! target, so a reader never sees a half-written document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{RecordStore, StoreError, StoreResult};
use crate::repository::{is_valid_name, Repository};

/// A [`RecordStore`] keeping one JSON document per repository.
#[derive(Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
    // serializes check-then-write sequences within this process
    write_lock: Mutex<()>,
}

impl DirectoryStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Keys that are not repository names would resolve outside `dir`.
    fn document_path(&self, name: &str) -> StoreResult<PathBuf> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }

    fn read(&self, name: &str) -> StoreResult<Repository> {
        match fs::read(self.document_path(name)?) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, record: &Repository) -> StoreResult<()> {
        let mut file = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut file, record)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(self.document_path(&record.name)?)
            .map_err(|e| StoreError::Io(e.error))?;
        debug!(name = %record.name, "wrote repository document");
        Ok(())
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.document_path(name)?.is_file())
    }

    /// Write `record` under its new key, then drop the document at `old`.
    /// If the old document cannot be removed the new one is deleted again,
    /// so the record never lives under both keys.
    fn move_document(&self, old: &str, record: &Repository) -> StoreResult<()> {
        self.write(record)?;
        if let Err(err) = fs::remove_file(self.document_path(old)?) {
            let written = self.document_path(&record.name)?;
            if let Err(e) = fs::remove_file(&written) {
                warn!(path = %written.display(), error = %e, "could not roll back moved document");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

impl RecordStore for DirectoryStore {
    fn get(&self, name: &str) -> StoreResult<Repository> {
        self.read(name)
    }

    fn insert(&self, record: &Repository) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        if self.exists(&record.name)? {
            return Err(StoreError::Duplicate(record.name.clone()));
        }
        self.write(record)
    }

    fn replace(&self, name: &str, record: &Repository) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        if !self.exists(name)? {
            return Err(StoreError::NotFound(name.to_string()));
        }
        if record.name != name {
            if self.exists(&record.name)? {
                return Err(StoreError::Duplicate(record.name.clone()));
            }
            return self.move_document(name, record);
        }
        self.write(record)
    }

    fn remove(&self, name: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.document_path(name)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (DirectoryStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DirectoryStore::open(temp_dir.path().join("records")).unwrap();
        (store, temp_dir)
    }

    fn repo(name: &str, users: &[&str]) -> Repository {
        Repository::new(name, users.iter().map(|u| u.to_string()).collect(), true)
    }

    #[test]
    fn test_insert_and_get() {
        let (store, _dir) = setup_store();
        let record = repo("someRepo", &["smeagol", "saruman"]);
        store.insert(&record).unwrap();

        assert!(store.path().join("someRepo.json").is_file());
        assert_eq!(store.get("someRepo").unwrap(), record);
    }

    #[test]
    fn test_insert_duplicate() {
        let (store, _dir) = setup_store();
        store.insert(&repo("someRepo", &["gollum"])).unwrap();
        let result = store.insert(&repo("someRepo", &["other"]));
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.get("someRepo").unwrap().users, vec!["gollum"]);
    }

    #[test]
    fn test_get_missing() {
        let (store, _dir) = setup_store();
        assert!(matches!(store.get("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_replace_in_place() {
        let (store, _dir) = setup_store();
        store.insert(&repo("proj1", &["umi"])).unwrap();
        store.replace("proj1", &repo("proj1", &["umi", "luke"])).unwrap();
        assert_eq!(store.get("proj1").unwrap().users, vec!["umi", "luke"]);
    }

    #[test]
    fn test_replace_renames_document() {
        let (store, _dir) = setup_store();
        store.insert(&repo("freedom", &["fss"])).unwrap();
        store.replace("freedom", &repo("free", &["fss"])).unwrap();

        assert!(store.get("freedom").unwrap_err().is_not_found());
        assert_eq!(store.get("free").unwrap(), repo("free", &["fss"]));
        assert!(!store.path().join("freedom.json").exists());
    }

    #[test]
    fn test_replace_missing() {
        let (store, _dir) = setup_store();
        let result = store.replace("ghost", &repo("ghost", &["a"]));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_remove() {
        let (store, _dir) = setup_store();
        store.insert(&repo("gone", &["a"])).unwrap();
        store.remove("gone").unwrap();
        assert!(store.get("gone").unwrap_err().is_not_found());
        assert!(store.remove("gone").unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupted_document() {
        let (store, _dir) = setup_store();
        fs::write(store.path().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(store.get("broken"), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_keys_outside_directory_are_rejected() {
        let (store, dir) = setup_store();
        fs::write(dir.path().join("outside.json"), "{}").unwrap();

        for name in ["../outside", "a/b", ""] {
            assert!(matches!(store.get(name), Err(StoreError::InvalidName(_))));
            assert!(matches!(store.remove(name), Err(StoreError::InvalidName(_))));
        }
        assert!(matches!(
            store.insert(&repo("../escape", &["a"])),
            Err(StoreError::InvalidName(_))
        ));
        assert!(dir.path().join("outside.json").is_file());
        assert!(!dir.path().join("escape.json").exists());
    }

    #[test]
    fn test_failed_move_keeps_single_document() {
        let (store, _dir) = setup_store();
        // a directory in place of the old document cannot be unlinked
        fs::create_dir(store.path().join("freedom.json")).unwrap();
        fs::write(store.path().join("freedom.json").join("pin"), "x").unwrap();

        let result = store.move_document("freedom", &repo("free", &["fss"]));
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!store.path().join("free.json").exists());
    }
}
