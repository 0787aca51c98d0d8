//! repohost - administrative command-line interface
//!
//! Drives the lifecycle manager and content reader against the configured
//! record store and bare repository root.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use repohost::config::Config;
use repohost::content::{ArchiveFormat, ContentReader};
use repohost::fs::OsFilesystem;
use repohost::plumbing::GitCommand;
use repohost::repository::{BareLocation, RemoteUrls, RepositoryManager};
use repohost::store::DirectoryStore;

#[derive(Parser, Debug)]
#[command(name = "repohost", version, about = "Bare repository hosting")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "REPOHOST_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a bare repository.
    Create {
        name: String,
        /// Users allowed to push; at least one.
        #[arg(short, long = "user", required = true)]
        users: Vec<String>,
        #[arg(long)]
        public: bool,
    },
    /// Remove a repository and its bare directory.
    Remove { name: String },
    Rename { old: String, new: String },
    /// Print a repository with its clone URLs.
    Show { name: String },
    /// Grant users access to repositories.
    Grant {
        #[arg(short, long = "repo", required = true)]
        repos: Vec<String>,
        #[arg(short, long = "user", required = true)]
        users: Vec<String>,
    },
    /// Revoke users' access to repositories.
    Revoke {
        #[arg(short, long = "repo", required = true)]
        repos: Vec<String>,
        #[arg(short, long = "user", required = true)]
        users: Vec<String>,
    },
    /// Expose or hide a repository on the read-only transport.
    Publish {
        name: String,
        #[arg(long)]
        off: bool,
    },
    /// List the tree at a ref.
    Tree {
        repo: String,
        #[arg(default_value = "master")]
        reference: String,
        #[arg(default_value = "")]
        path: String,
    },
    /// Print a file at a ref.
    Cat {
        repo: String,
        reference: String,
        path: String,
    },
    /// List branches, newest first.
    Branches { repo: String },
    /// List refs matching a pattern, newest first.
    Refs {
        repo: String,
        #[arg(default_value = "refs/")]
        pattern: String,
    },
    /// Write an archive of a ref.
    Archive {
        repo: String,
        reference: String,
        #[arg(short, long, default_value = "zip")]
        format: String,
        /// Output file; defaults to `<repo>-<ref>.<format>`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

struct App {
    config: Config,
    manager: RepositoryManager,
    reader: ContentReader,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let fs = Arc::new(OsFilesystem);
        let git = Arc::new(GitCommand::from_config(&config, fs.clone()));
        let store = DirectoryStore::open(&config.store.path)
            .with_context(|| format!("failed to open record store {}", config.store.path.display()))?;

        let manager = RepositoryManager::new(
            Arc::new(store),
            fs,
            git.clone(),
            BareLocation::new(&config.bare.location),
        );
        let reader = ContentReader::new(git);

        Ok(Self {
            config,
            manager,
            reader,
        })
    }

    fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Create { name, users, public } => {
                let repository = self.manager.create(&name, users, public)?;
                print_json(&RemoteUrls::from_config(&self.config).view(&repository))
            }
            Command::Remove { name } => Ok(self.manager.remove(&name)?),
            Command::Rename { old, new } => Ok(self.manager.rename(&old, &new)?),
            Command::Show { name } => {
                let repository = self.manager.get(&name)?;
                print_json(&RemoteUrls::from_config(&self.config).view(&repository))
            }
            Command::Grant { repos, users } => Ok(self.manager.grant_access(&repos, &users)?),
            Command::Revoke { repos, users } => Ok(self.manager.revoke_access(&repos, &users)?),
            Command::Publish { name, off } => {
                let repository = self.manager.set_public(&name, !off)?;
                print_json(&RemoteUrls::from_config(&self.config).view(&repository))
            }
            Command::Tree {
                repo,
                reference,
                path,
            } => print_json(&self.reader.get_tree(&repo, &reference, &path)?),
            Command::Cat {
                repo,
                reference,
                path,
            } => {
                let contents = self.reader.get_file_contents(&repo, &reference, &path)?;
                std::io::stdout().write_all(&contents)?;
                Ok(())
            }
            Command::Branches { repo } => print_json(&self.reader.get_branch(&repo)?),
            Command::Refs { repo, pattern } => {
                print_json(&self.reader.get_for_each_ref(&repo, &pattern)?)
            }
            Command::Archive {
                repo,
                reference,
                format,
                output,
            } => {
                let format = ArchiveFormat::from_name(&format);
                let bytes = self.reader.get_archive(&repo, &reference, format)?;
                let output = output.unwrap_or_else(|| default_archive_name(&repo, &reference, format));
                std::fs::write(&output, &bytes)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                debug!(path = %output.display(), bytes = bytes.len(), "archive written");
                Ok(())
            }
        }
    }
}

/// `<repo>-<ref>.<ext>` in the current directory; slashes in the ref are
/// flattened so `feature/x` does not name a subdirectory.
fn default_archive_name(repo: &str, reference: &str, format: ArchiveFormat) -> PathBuf {
    let reference = reference.replace('/', "-");
    PathBuf::from(format!("{}-{}{}", repo, reference, format.extension()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_ref())
        .and_then(App::new)
        .and_then(|app| app.run(cli.command));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
