//! Local directory content source

use super::source::ContentSource;
use crate::domain::{Entry, RepoDetails, UNDECODABLE_PLACEHOLDER};
use crate::error::SourceError;
use crate::utils::{read_text_file, stable_id};
use async_trait::async_trait;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Serves a directory on disk as if it were a remote repository.
///
/// Listing honours `.gitignore` files (a git checkout is not required).
/// Content identities are hashes of the relative path, resolved back to
/// files through the map filled during listing.
pub struct LocalSource {
    root: PathBuf,
    respect_gitignore: bool,
    files: Mutex<HashMap<String, PathBuf>>,
}

impl LocalSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let root = path.canonicalize().map_err(|_| {
            SourceError::NotFound(format!("Path does not exist: {}", path.display()))
        })?;
        if !root.is_dir() {
            return Err(SourceError::Other(format!("Path is not a directory: {}", path.display())));
        }
        Ok(Self { root, respect_gitignore: true, files: Mutex::new(HashMap::new()) })
    }

    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.respect_gitignore = yes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string())
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> =
            rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn repo_details(&self, owner: &str, repo: &str) -> Result<RepoDetails, SourceError> {
        Ok(RepoDetails {
            owner: owner.to_string(),
            name: if repo.is_empty() { self.dir_name() } else { repo.to_string() },
            default_branch: "HEAD".to_string(),
            stars: 0,
            description: self.root.display().to_string(),
        })
    }

    async fn repo_tree(&self, _: &str, _: &str, _: &str) -> Result<Vec<Entry>, SourceError> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .git_ignore(self.respect_gitignore)
            .git_global(false)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .hidden(false)
            .parents(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|e| e.file_name() != ".git");

        let mut entries = Vec::new();
        let mut files = HashMap::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let Some(rel) = self.relative(entry.path()) else {
                continue;
            };
            let Some(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                entries.push(Entry::directory(rel));
            } else if file_type.is_file() {
                let size = entry.metadata().ok().map(|m| m.len());
                let id = stable_id(&rel);
                files.insert(id.clone(), entry.path().to_path_buf());
                entries.push(Entry::file(rel, size, id));
            }
        }

        debug!("Listed {} entries under {}", entries.len(), self.root.display());
        let mut map = self
            .files
            .lock()
            .map_err(|_| SourceError::Other("local file index is poisoned".into()))?;
        *map = files;
        Ok(entries)
    }

    async fn file_content(
        &self,
        _: &str,
        _: &str,
        content_hash: &str,
    ) -> Result<String, SourceError> {
        let path = {
            let map = self
                .files
                .lock()
                .map_err(|_| SourceError::Other("local file index is poisoned".into()))?;
            map.get(content_hash).cloned()
        };
        let path = path.ok_or_else(|| {
            SourceError::NotFound(format!("No listed file with identity {}", content_hash))
        })?;

        match read_text_file(&path) {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Ok(UNDECODABLE_PLACEHOLDER.to_string()),
            Err(e) => Err(SourceError::Other(format!("{:#}", e))),
        }
    }
}
