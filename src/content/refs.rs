//! `for-each-ref` output parsing.

use serde::{Deserialize, Serialize};

use super::error::{ContentError, ContentResult};

/// Format handed to `for-each-ref`: seven tab-separated fields, the subject
/// last so that tabs inside it stay part of it.
pub const REF_FORMAT: &str = "%(objectname)%09%(refname)%09%(committername)%09%(committeremail)%09%(authorname)%09%(authoremail)%09%(subject)";

/// Sort order requested from `for-each-ref`; newest commits first.
pub const REF_SORT: &str = "-committerdate";

const FIELDS: usize = 7;

/// One ref with its tip commit's metadata.
///
/// The serialized committer keys are spelled `commiterName`/`commiterEmail`,
/// which is what API clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefEntry {
    /// Object id the ref points at.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Last path segment of the ref name.
    pub name: String,
    #[serde(rename = "commiterName")]
    pub committer_name: String,
    /// Angle-bracket wrapped, as git prints it.
    #[serde(rename = "commiterEmail")]
    pub committer_email: String,
    #[serde(rename = "authorName")]
    pub author_name: String,
    #[serde(rename = "authorEmail")]
    pub author_email: String,
    pub subject: String,
}

pub fn parse_refs(output: &[u8]) -> ContentResult<Vec<RefEntry>> {
    let text = String::from_utf8_lossy(output);
    text.split('\n')
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> ContentResult<RefEntry> {
    let fields: Vec<&str> = line.splitn(FIELDS, '\t').collect();
    if fields.len() != FIELDS {
        return Err(ContentError::Parse {
            what: "for-each-ref",
            line: line.to_string(),
        });
    }

    Ok(RefEntry {
        reference: fields[0].to_string(),
        name: short_name(fields[1]).to_string(),
        committer_name: fields[2].to_string(),
        committer_email: fields[3].to_string(),
        author_name: fields[4].to_string(),
        author_email: fields[5].to_string(),
        subject: fields[6].to_string(),
    })
}

fn short_name(refname: &str) -> &str {
    refname.rsplit('/').next().unwrap_or(refname)
}
