//! Archive format selection.
//!
//! The container itself is produced by `git archive`; this module only picks
//! the arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ContentError;

/// Supported container formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    #[default]
    Zip,
    Tar,
}

impl ArchiveFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tar => "tar",
        }
    }

    /// Lenient parse: anything unrecognized falls back to zip.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(format = %name, "unknown archive format, falling back to zip");
            ArchiveFormat::default()
        })
    }

    /// File extension including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => ".zip",
            ArchiveFormat::Tar => ".tar",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveFormat {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(ArchiveFormat::Zip),
            "tar" => Ok(ArchiveFormat::Tar),
            _ => Err(ContentError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Directory every archive member is placed under: `<repo>-<ref>/`.
pub fn archive_prefix(repo: &str, reference: &str) -> String {
    format!("{}-{}/", repo, reference)
}

/// Arguments for `git archive`.
pub fn archive_args(repo: &str, reference: &str, format: ArchiveFormat) -> Vec<String> {
    vec![
        format!("--prefix={}", archive_prefix(repo, reference)),
        format!("--format={}", format.as_str()),
        reference.to_string(),
    ]
}
