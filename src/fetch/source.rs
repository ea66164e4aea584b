//! The content-retrieval collaborator seam.

use crate::domain::{Entry, RepoDetails};
use crate::error::SourceError;
use async_trait::async_trait;

/// Where repository metadata, listings and file contents come from.
///
/// Implementations report the distinct failure kinds of [`SourceError`] and
/// never retry on their own.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short label for logs ("github", "local").
    fn name(&self) -> &'static str;

    async fn repo_details(&self, owner: &str, repo: &str) -> Result<RepoDetails, SourceError>;

    async fn repo_tree(&self, owner: &str, repo: &str, branch: &str)
        -> Result<Vec<Entry>, SourceError>;

    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        content_hash: &str,
    ) -> Result<String, SourceError>;
}
