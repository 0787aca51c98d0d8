//! Plumbing test double.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;

use super::error::{PlumbingError, PlumbingResult};
use super::{Plumbing, Subcommand};

/// A prepared answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canned {
    Output(Vec<u8>),
    ToolNotFound(String),
    /// fails with the given status text, e.g. `exit status 128`
    Failed(String),
    RepositoryNotFound,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub repo: String,
    pub subcommand: Subcommand,
    pub args: Vec<String>,
}

/// [`Plumbing`] that never spawns a process.
///
/// Answers with a per-subcommand response when one is set, otherwise the
/// default (empty output unless changed), and records every call.
#[derive(Debug)]
pub struct CannedPlumbing {
    default: Canned,
    responses: HashMap<Subcommand, Canned>,
    invocations: Mutex<Vec<Invocation>>,
}

impl Default for CannedPlumbing {
    fn default() -> Self {
        Self::new(Canned::Output(Vec::new()))
    }
}

impl CannedPlumbing {
    pub fn new(default: Canned) -> Self {
        Self {
            default,
            responses: HashMap::new(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_output(output: impl Into<Vec<u8>>) -> Self {
        Self::new(Canned::Output(output.into()))
    }

    /// Override the answer for one subcommand.
    pub fn on(mut self, subcommand: Subcommand, response: Canned) -> Self {
        self.responses.insert(subcommand, response);
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().clone()
    }

    pub fn last_invocation(&self) -> Option<Invocation> {
        self.invocations.lock().last().cloned()
    }
}

impl Plumbing for CannedPlumbing {
    fn run(&self, repo: &str, subcommand: Subcommand, args: &[String]) -> PlumbingResult<Vec<u8>> {
        self.invocations.lock().push(Invocation {
            repo: repo.to_string(),
            subcommand,
            args: args.to_vec(),
        });

        match self.responses.get(&subcommand).unwrap_or(&self.default) {
            Canned::Output(bytes) => Ok(bytes.clone()),
            Canned::ToolNotFound(binary) => Err(PlumbingError::ToolNotFound {
                binary: binary.clone(),
            }),
            Canned::Failed(status) => Err(PlumbingError::ExecutionFailed {
                status: status.clone(),
                stderr: String::new(),
            }),
            Canned::RepositoryNotFound => Err(PlumbingError::RepositoryNotFound {
                path: PathBuf::from(format!("{}.git", repo)),
            }),
        }
    }
}
