//! Service configuration.
//!
//! Everything the core needs to know about its environment: where bare
//! repositories live, which binary to run, and the host/ssh settings the
//! clone URLs are derived from. Loaded from a TOML file and handed to
//! components at construction.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Public host name used in clone URLs.
    pub host: String,
    /// Host advertised in read-only URLs, when different from `host`.
    #[serde(default)]
    pub readonly_host: Option<String>,
    /// Remote user id used in ssh URLs.
    #[serde(default = "default_uid")]
    pub uid: String,
    #[serde(default)]
    pub bare: BareConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_uid() -> String {
    "git".to_string()
}

/// Where bare repositories are kept on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareConfig {
    #[serde(default = "BareConfig::default_location")]
    pub location: PathBuf,
    /// Template directory passed to `git init --bare --template=`.
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl BareConfig {
    fn default_location() -> PathBuf {
        PathBuf::from("/var/repositories")
    }
}

impl Default for BareConfig {
    fn default() -> Self {
        Self {
            location: Self::default_location(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Name or path of the git executable.
    #[serde(default = "GitConfig::default_binary")]
    pub binary: String,
    #[serde(default)]
    pub ssh: SshConfig,
}

impl GitConfig {
    fn default_binary() -> String {
        "git".to_string()
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: Self::default_binary(),
            ssh: SshConfig::default(),
        }
    }
}

/// Whether clone URLs use the `ssh://` form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshConfig {
    #[serde(rename = "use", default)]
    pub enabled: bool,
    #[serde(default)]
    pub port: Option<String>,
}

/// Location of the JSON record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_path")]
    pub path: PathBuf,
}

impl StoreConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("/var/lib/repohost/records")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            readonly_host: None,
            uid: default_uid(),
            bare: BareConfig::default(),
            git: GitConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Create a configuration for the given host with defaults elsewhere.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Set the read-only host.
    pub fn readonly_host(mut self, host: impl Into<String>) -> Self {
        self.readonly_host = Some(host.into());
        self
    }

    /// Set the remote user id.
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Enable ssh URLs, optionally on a non-default port.
    pub fn ssh(mut self, port: Option<&str>) -> Self {
        self.git.ssh = SshConfig {
            enabled: true,
            port: port.map(str::to_string),
        };
        self
    }

    /// Set the bare repositories root.
    pub fn bare_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.bare.location = location.into();
        self
    }

    /// Set the git executable.
    pub fn git_binary(mut self, binary: impl Into<String>) -> Self {
        self.git.binary = binary.into();
        self
    }

    /// Set the record store directory.
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.path = path.into();
        self
    }
}
