//! `ls-tree -r -l` output parsing.
//!
//! Each line is `<mode> SP <type> SP <object> SP+ <size> TAB <path>`. The
//! size column is right-aligned, so the metadata is split on runs of
//! whitespace; the path is everything after the first tab. Git never leaves
//! a raw tab in an unquoted path, so the first tab is always the separator.

use serde::{Deserialize, Serialize};

use super::error::{ContentError, ContentResult};
use super::quoting;

/// One row of a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntry {
    /// Object mode, e.g. `100644`.
    pub permission: String,
    /// `blob`, `tree` or `commit`.
    pub filetype: String,
    pub hash: String,
    /// Size in bytes as printed by git, `-` for non-blobs.
    pub size: String,
    /// Display form of the path.
    pub path: String,
    /// Path exactly as git printed it, quotes included.
    pub raw_path: String,
}

impl TreeEntry {
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.parse().ok()
    }

    pub fn is_blob(&self) -> bool {
        self.filetype == "blob"
    }
}

/// Parse the full stdout of `ls-tree -r -l`. Empty output is an empty tree.
pub fn parse_tree(output: &[u8]) -> ContentResult<Vec<TreeEntry>> {
    let text = String::from_utf8_lossy(output);
    text.lines()
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> ContentResult<TreeEntry> {
    let malformed = || ContentError::Parse {
        what: "ls-tree",
        line: line.to_string(),
    };

    let (meta, raw_path) = line.split_once('\t').ok_or_else(malformed)?;
    let mut fields = meta.split_whitespace();
    let (Some(permission), Some(filetype), Some(hash), Some(size), None) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return Err(malformed());
    };
    if raw_path.is_empty() {
        return Err(malformed());
    }

    Ok(TreeEntry {
        permission: permission.to_string(),
        filetype: filetype.to_string(),
        hash: hash.to_string(),
        size: size.to_string(),
        path: quoting::display_path(raw_path),
        raw_path: raw_path.to_string(),
    })
}
