//! Filesystem operations the lifecycle needs.
//!
//! Kept behind the [`Filesystem`] trait so that tests can swap in
//! [`RecordingFs`] and assert which operations ran against which paths.

mod recording;

use std::fs;
use std::io;
use std::path::Path;

pub use recording::RecordingFs;

/// Directory and marker-file operations on bare repositories.
pub trait Filesystem: Send + Sync {
    fn dir_exists(&self, path: &Path) -> io::Result<bool>;

    /// Create (or truncate) an empty file.
    fn create_file(&self, path: &Path) -> io::Result<()>;

    /// Recursively delete a directory. A missing directory is not an error.
    fn remove_all(&self, path: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn dir_exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        fs::File::create(path).map(|_| ())
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_os_filesystem_roundtrip() {
        let dir = TempDir::new().unwrap();
        let osfs = OsFilesystem;
        let repo = dir.path().join("myRepo.git");

        assert!(!osfs.dir_exists(&repo).unwrap());
        fs::create_dir(&repo).unwrap();
        assert!(osfs.dir_exists(&repo).unwrap());

        let marker = repo.join("git-daemon-export-ok");
        osfs.create_file(&marker).unwrap();
        assert!(marker.is_file());
        osfs.remove_file(&marker).unwrap();
        assert!(!marker.exists());

        let renamed = dir.path().join("other.git");
        osfs.rename(&repo, &renamed).unwrap();
        assert!(!osfs.dir_exists(&repo).unwrap());
        assert!(osfs.dir_exists(&renamed).unwrap());

        osfs.remove_all(&renamed).unwrap();
        assert!(!renamed.exists());
    }

    #[test]
    fn test_dir_exists_on_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();
        assert!(!OsFilesystem.dir_exists(&file).unwrap());
    }

    #[test]
    fn test_remove_all_missing_directory() {
        let dir = TempDir::new().unwrap();
        OsFilesystem.remove_all(&dir.path().join("gone.git")).unwrap();
    }
}
