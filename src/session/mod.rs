//! Ingestion session: the single owner of tree, contents, digests and chat.
//!
//! A new ingestion bumps the generation and drops everything derived from
//! the previous repository. Fetch outcomes carry the generation they were
//! requested under; mismatches are discarded instead of applied.

use crate::chat::ChatSession;
use crate::domain::{Config, ExtensionStat, FileTree, ProcessingStats, RepoDetails};
use crate::error::{SelectionError, SessionError};
use crate::fetch::{
    ContentFetcher, ContentSource, FetchOutcome, FetchRequest, ProgressRange, ProgressUpdate,
};
use crate::render::Digest;
use crate::scan::build_tree;
use crate::select;
use tracing::{debug, info, warn};

/// Where in 0–100 each ingestion stage reports.
const PROGRESS_DETAILS: u8 = 5;
const PROGRESS_TREE: u8 = 20;
pub const PROGRESS_STRUCTURE: u8 = 40;
const PROGRESS_CONTENT_END: u8 = 95;
const PROGRESS_REFRESH_START: u8 = 10;

#[derive(Debug, Default)]
pub struct Workspace {
    generation: u64,
    repo: Option<RepoDetails>,
    tree: FileTree,
    digest: Option<Digest>,
    chat: ChatSession,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new session for `repo`. Returns the new generation.
    pub fn begin(&mut self, repo: RepoDetails, tree: FileTree) -> u64 {
        self.generation += 1;
        self.repo = Some(repo);
        self.tree = tree;
        self.digest = None;
        self.chat.clear();
        debug!("Started session generation {}", self.generation);
        self.generation
    }

    pub fn repo(&self) -> Option<&RepoDetails> {
        self.repo.as_ref()
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// The tree and chat history together, for asking a question.
    pub fn chat_parts(&mut self) -> (&FileTree, &mut ChatSession) {
        (&self.tree, &mut self.chat)
    }

    /// Selected files that still need their content.
    pub fn pending_requests(&self) -> Vec<FetchRequest> {
        self.tree.files().into_iter().filter_map(FetchRequest::for_node).collect()
    }

    /// Write fetched contents into the tree.
    ///
    /// Returns `false`, changing nothing, when the outcome belongs to an
    /// earlier session.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            warn!(
                "Discarding {} fetched files from stale session {} (current {})",
                outcome.contents.len(),
                outcome.generation,
                self.generation
            );
            return false;
        }

        let mut contents = outcome.contents;
        self.tree.for_each_file_mut(|file| {
            if let Some(content) = contents.remove(&file.path) {
                file.content = Some(content);
            }
        });
        if !contents.is_empty() {
            debug!("{} fetched paths are not in the tree", contents.len());
        }
        self.digest = None;
        true
    }

    pub fn toggle(&mut self, path: &str, checked: bool) -> Result<(), SelectionError> {
        select::toggle(&mut self.tree, path, checked)?;
        self.digest = None;
        Ok(())
    }

    pub fn toggle_extension(&mut self, ext: &str) -> Option<bool> {
        let applied = select::toggle_extension(&mut self.tree, ext)?;
        self.digest = None;
        Some(applied)
    }

    pub fn extension_stats(&self) -> Vec<ExtensionStat> {
        select::extension_stats(&self.tree)
    }

    pub fn processing_stats(&self) -> ProcessingStats {
        select::processing_stats(&self.tree)
    }

    /// Digests of the current state, rendered on first use after a change.
    pub fn digest(&mut self) -> Option<&Digest> {
        if self.digest.is_none() {
            let repo = self.repo.as_ref()?;
            self.digest = Some(Digest::render(repo, &self.tree));
        }
        self.digest.as_ref()
    }
}

/// Drives a [`Workspace`] through listing, tree building and content fetching.
pub struct Ingestor<'a, S: ?Sized> {
    source: &'a S,
    config: &'a Config,
    fetcher: ContentFetcher,
}

impl<'a, S> Ingestor<'a, S>
where
    S: ContentSource + ?Sized,
{
    pub fn new(source: &'a S, config: &'a Config) -> Self {
        Self { source, config, fetcher: ContentFetcher::new(config.fetch_batch_size) }
    }

    /// Ingest `owner/repo` at `branch` (the default branch when `None`),
    /// then fetch content for the auto-selected files.
    pub async fn ingest(
        &self,
        workspace: &mut Workspace,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
        mut on_progress: impl FnMut(ProgressUpdate),
    ) -> Result<(), SessionError> {
        self.load(workspace, owner, repo, branch, &mut on_progress).await?;
        self.refresh_from(workspace, PROGRESS_STRUCTURE, &mut on_progress).await
    }

    /// Details, listing and tree building only; no content is fetched.
    ///
    /// Listing failures abort and leave `workspace` untouched.
    pub async fn load(
        &self,
        workspace: &mut Workspace,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
        mut on_progress: impl FnMut(ProgressUpdate),
    ) -> Result<(), SessionError> {
        stage(&mut on_progress, PROGRESS_DETAILS, "Fetching repository details...");
        let details = self.source.repo_details(owner, repo).await?;

        stage(&mut on_progress, PROGRESS_TREE, "Fetching file tree...");
        let branch = branch.unwrap_or(&details.default_branch).to_string();
        let entries = self.source.repo_tree(&details.owner, &details.name, &branch).await?;

        stage(&mut on_progress, PROGRESS_STRUCTURE, "Processing file structure...");
        let tree = build_tree(self.config, &entries)?;
        info!(
            "Ingested {} ({} entries listed, {} files kept)",
            details.slug(),
            entries.len(),
            tree.files().len()
        );
        workspace.begin(details, tree);
        Ok(())
    }

    /// Fetch content for newly selected files and re-render the digests.
    pub async fn refresh(
        &self,
        workspace: &mut Workspace,
        on_progress: impl FnMut(ProgressUpdate),
    ) -> Result<(), SessionError> {
        self.refresh_from(workspace, PROGRESS_REFRESH_START, on_progress).await
    }

    /// Like [`Ingestor::refresh`], reporting content progress from `start` to 95.
    pub async fn refresh_from(
        &self,
        workspace: &mut Workspace,
        start: u8,
        mut on_progress: impl FnMut(ProgressUpdate),
    ) -> Result<(), SessionError> {
        let (owner, name) = match workspace.repo() {
            Some(repo) => (repo.owner.clone(), repo.name.clone()),
            None => return Err(SessionError::NotIngested),
        };

        let requests = workspace.pending_requests();
        if !requests.is_empty() {
            let range = ProgressRange::new(f64::from(start), f64::from(PROGRESS_CONTENT_END));
            let generation = workspace.generation();
            let outcome = self
                .fetcher
                .fetch(self.source, &owner, &name, generation, &requests, range, &mut on_progress)
                .await;
            workspace.apply(outcome);
        }

        workspace.digest();
        stage(&mut on_progress, 100, "Complete");
        Ok(())
    }
}

fn stage(on_progress: &mut impl FnMut(ProgressUpdate), percent: u8, status: &str) {
    on_progress(ProgressUpdate { percent, status: status.to_string(), completed: 0, total: 0 });
}
