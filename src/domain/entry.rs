//! Raw repository listing records and repository metadata.

use serde::{Deserialize, Serialize};

/// Whether a listing record (or tree node) is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// One path record as received from a repository listing, before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
    /// Opaque identity used to fetch content. Directories carry none.
    pub content_hash: Option<String>,
}

impl Entry {
    pub fn file(
        path: impl Into<String>,
        size: Option<u64>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
            content_hash: Some(content_hash.into()),
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: EntryKind::Directory, size: None, content_hash: None }
    }
}

/// Repository metadata returned by the content-retrieval collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDetails {
    pub owner: String,
    pub name: String,
    pub default_branch: String,
    pub stars: u64,
    pub description: String,
}

impl RepoDetails {
    /// `owner/name`, as shown in digest headers.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
