//! Runs the system `git` binary.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::error::{PlumbingError, PlumbingResult};
use super::{Plumbing, Subcommand};
use crate::config::Config;
use crate::fs::Filesystem;
use crate::repository::{is_valid_name, BareLocation};

/// [`Plumbing`] backed by a git executable.
///
/// Commands other than `init --bare` run with the bare directory as working
/// directory, after checking through the [`Filesystem`] that it exists.
/// A name that is not a valid repository name never resolves to a path.
pub struct GitCommand {
    binary: String,
    location: BareLocation,
    template: Option<PathBuf>,
    fs: Arc<dyn Filesystem>,
}

impl GitCommand {
    pub fn new(binary: impl Into<String>, location: BareLocation, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            binary: binary.into(),
            location,
            template: None,
            fs,
        }
    }

    pub fn from_config(config: &Config, fs: Arc<dyn Filesystem>) -> Self {
        Self::new(
            config.git.binary.clone(),
            BareLocation::new(config.bare.location.clone()),
            fs,
        )
        .template(config.bare.template.clone())
    }

    /// Template directory for `init --bare`.
    pub fn template(mut self, template: Option<PathBuf>) -> Self {
        self.template = template;
        self
    }

    pub fn location(&self) -> &BareLocation {
        &self.location
    }

    fn build(&self, repo: &str, subcommand: Subcommand, args: &[String]) -> PlumbingResult<Command> {
        let path = self.location.path_for(repo);
        if !is_valid_name(repo) {
            return Err(PlumbingError::RepositoryNotFound { path });
        }
        let mut cmd = Command::new(&self.binary);
        cmd.args(subcommand.args());

        if subcommand == Subcommand::InitBare {
            if let Some(template) = &self.template {
                cmd.arg(format!("--template={}", template.display()));
            }
            cmd.args(args).arg(&path);
        } else {
            if !self.fs.dir_exists(&path)? {
                return Err(PlumbingError::RepositoryNotFound { path });
            }
            cmd.args(args).current_dir(&path);
        }

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        Ok(cmd)
    }
}

impl Plumbing for GitCommand {
    #[instrument(skip(self, subcommand, args), fields(subcommand = %subcommand))]
    fn run(&self, repo: &str, subcommand: Subcommand, args: &[String]) -> PlumbingResult<Vec<u8>> {
        let mut cmd = self.build(repo, subcommand, args)?;

        debug!(?args, "spawning {}", self.binary);

        let output = cmd.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PlumbingError::ToolNotFound {
                    binary: self.binary.clone(),
                }
            } else {
                PlumbingError::Io(e)
            }
        })?;

        if !output.status.success() {
            let err = PlumbingError::failed(output.status, &output.stderr);
            if let PlumbingError::ExecutionFailed { status, stderr } = &err {
                debug!(%status, %stderr, "plumbing command failed");
            }
            return Err(err);
        }

        if !output.stderr.is_empty() {
            warn!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "plumbing command succeeded with output on stderr"
            );
        }

        debug!(bytes = output.stdout.len(), "plumbing command complete");
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{OsFilesystem, RecordingFs};
    use tempfile::TempDir;

    #[test]
    fn test_missing_repository() {
        let git = GitCommand::new("git", BareLocation::new("/srv"), Arc::new(RecordingFs::new()));
        let err = git.run("ghost", Subcommand::Show, &[]).unwrap_err();
        match err {
            PlumbingError::RepositoryNotFound { path } => {
                assert_eq!(path, PathBuf::from("/srv/ghost.git"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tool_not_found() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("repo.git")).unwrap();
        let git = GitCommand::new(
            "definitely-not-a-git-binary",
            BareLocation::new(dir.path()),
            Arc::new(OsFilesystem),
        );
        let err = git.run("repo", Subcommand::Show, &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "definitely-not-a-git-binary: executable file not found in $PATH"
        );
    }

    #[test]
    fn test_init_bare_skips_existence_check() {
        let git = GitCommand::new(
            "definitely-not-a-git-binary",
            BareLocation::new("/srv"),
            Arc::new(RecordingFs::new()),
        );
        let err = git.run("new", Subcommand::InitBare, &[]).unwrap_err();
        assert!(err.is_tool_not_found());
    }

    #[test]
    fn test_build_init_bare_with_template() {
        let git = GitCommand::new("git", BareLocation::new("/srv"), Arc::new(RecordingFs::new()))
            .template(Some(PathBuf::from("/tpl")));
        let cmd = git.build("myRepo", Subcommand::InitBare, &[]).unwrap();
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["init", "--bare", "--template=/tpl", "/srv/myRepo.git"]);
        assert_eq!(cmd.get_current_dir(), None);
    }

    #[test]
    fn test_build_read_command_runs_in_repository() {
        let rfs = RecordingFs::new().with_dir("/srv/myRepo.git");
        let git = GitCommand::new("git", BareLocation::new("/srv"), Arc::new(rfs));
        let cmd = git
            .build("myRepo", Subcommand::Show, &["master:README".to_string()])
            .unwrap();
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["show", "master:README"]);
        assert_eq!(
            cmd.get_current_dir(),
            Some(std::path::Path::new("/srv/myRepo.git"))
        );
    }

    #[test]
    fn test_name_outside_root_is_not_found() {
        let rfs = RecordingFs::new().with_dir("/srv/../etc/r.git");
        let git = GitCommand::new("git", BareLocation::new("/srv"), Arc::new(rfs));
        for name in ["../etc/r", "a/b", ""] {
            let err = git.build(name, Subcommand::Show, &[]).unwrap_err();
            assert!(matches!(err, PlumbingError::RepositoryNotFound { .. }), "{name}");
            assert_eq!(err.to_string(), "Repository does not exist");
        }
        assert!(git.build("../x", Subcommand::InitBare, &[]).is_err());
    }
}
