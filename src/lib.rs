//! repohost - bare repository hosting core
//!
//! This crate manages bare git repositories on a host and serves their
//! content. Each repository has a record (name, authorized users, public
//! flag) and a bare directory under a configured root. Content is read by
//! running git plumbing commands against that directory.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use repohost::config::Config;
//! use repohost::content::ContentReader;
//! use repohost::fs::OsFilesystem;
//! use repohost::plumbing::GitCommand;
//! use repohost::repository::{BareLocation, RepositoryManager};
//! use repohost::store::DirectoryStore;
//!
//! let config = Config::new("git.example.com").bare_location("/srv/git");
//! let fs = Arc::new(OsFilesystem);
//! let git = Arc::new(GitCommand::from_config(&config, fs.clone()));
//! let store = Arc::new(DirectoryStore::open(&config.store.path).unwrap());
//!
//! let manager = RepositoryManager::new(store, fs, git.clone(), BareLocation::new(&config.bare.location));
//! manager.create("website", vec!["alice".into()], true).unwrap();
//!
//! let reader = ContentReader::new(git);
//! let readme = reader.get_file_contents("website", "master", "README").unwrap();
//! ```

pub mod config;
pub mod content;
pub mod fs;
pub mod plumbing;
pub mod repository;
pub mod store;
