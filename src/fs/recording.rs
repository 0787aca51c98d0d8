//! A fake filesystem that records what was asked of it.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::Filesystem;

/// Records every mutating call as a line like `create <path>`,
/// `removeall <path>`, `remove <path>` or `rename <from> <to>`.
///
/// Directories are tracked so `dir_exists` answers consistently with earlier
/// renames and removals. Any action whose text starts with a registered
/// prefix fails with a permission error instead of being recorded.
#[derive(Debug, Default)]
pub struct RecordingFs {
    actions: Mutex<Vec<String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `path` is an existing directory.
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs.lock().insert(path.into());
        self
    }

    /// Make every action starting with `prefix` fail.
    pub fn fail_on(self, prefix: impl Into<String>) -> Self {
        self.failures.lock().push(prefix.into());
        self
    }

    /// Register a directory after construction, e.g. one made by `git init`.
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.dirs.lock().insert(path.into());
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.lock().iter().any(|a| a == action)
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().clone()
    }

    fn record(&self, action: String) -> io::Result<()> {
        if self.failures.lock().iter().any(|p| action.starts_with(p.as_str())) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure: {}", action),
            ));
        }
        self.actions.lock().push(action);
        Ok(())
    }
}

impl Filesystem for RecordingFs {
    fn dir_exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.dirs.lock().contains(path))
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        self.record(format!("create {}", path.display()))
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        self.record(format!("removeall {}", path.display()))?;
        self.dirs.lock().retain(|d| !d.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.record(format!("remove {}", path.display()))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record(format!("rename {} {}", from.display(), to.display()))?;
        let mut dirs = self.dirs.lock();
        if dirs.remove(from) {
            dirs.insert(to.to_path_buf());
        }
        Ok(())
    }
}
