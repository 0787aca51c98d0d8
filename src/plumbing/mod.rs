//! Plumbing invoker.
//!
//! Every read and the bare-repository creation go through the [`Plumbing`]
//! trait. [`GitCommand`] runs the real binary; [`CannedPlumbing`] answers
//! with prepared output so the layers above can be tested without a git
//! installation.

mod canned;
mod error;
mod git;

use std::fmt;

pub use canned::{Canned, CannedPlumbing, Invocation};
pub use error::{describe_status, PlumbingError, PlumbingResult};
pub use git::GitCommand;

/// The fixed set of subcommands the core issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    /// `init --bare`, run against the path the repository will occupy
    InitBare,
    Show,
    LsTree,
    ForEachRef,
    Archive,
}

impl Subcommand {
    /// The leading arguments that select this subcommand.
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            Subcommand::InitBare => &["init", "--bare"],
            Subcommand::Show => &["show"],
            Subcommand::LsTree => &["ls-tree"],
            Subcommand::ForEachRef => &["for-each-ref"],
            Subcommand::Archive => &["archive"],
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}

/// Runs a plumbing subcommand against a named repository.
///
/// Implementations resolve the repository's on-disk path themselves and
/// return stdout fully buffered.
pub trait Plumbing: Send + Sync {
    fn run(&self, repo: &str, subcommand: Subcommand, args: &[String]) -> PlumbingResult<Vec<u8>>;
}
