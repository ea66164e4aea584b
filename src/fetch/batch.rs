//! Batched content fetching with progress reporting.

use super::notebook;
use super::source::ContentSource;
use crate::domain::{Node, DEFAULT_FETCH_BATCH_SIZE, FETCH_ERROR_PLACEHOLDER};
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One file whose content should be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub path: String,
    pub content_hash: String,
}

impl FetchRequest {
    pub fn new(path: impl Into<String>, content_hash: impl Into<String>) -> Self {
        Self { path: path.into(), content_hash: content_hash.into() }
    }

    /// A request for a selected file that has an identity and no content yet.
    pub fn for_node(node: &Node) -> Option<Self> {
        if !node.is_file() || !node.is_selected || node.content.is_some() {
            return None;
        }
        let hash = node.content_hash.as_ref()?;
        Some(Self::new(node.path.clone(), hash.clone()))
    }
}

/// The slice of the overall progress bar a fetch run reports into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRange {
    pub start: f64,
    pub end: f64,
}

impl ProgressRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn percent(&self, completed: usize, total: usize) -> u8 {
        if total == 0 {
            return self.end.round() as u8;
        }
        let ratio = completed as f64 / total as f64;
        (self.start + ratio * (self.end - self.start)).round().clamp(0.0, 100.0) as u8
    }
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub status: String,
    pub completed: usize,
    pub total: usize,
}

/// Contents keyed by path, tagged with the session that requested them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub generation: u64,
    pub contents: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ContentFetcher {
    batch_size: usize,
}

impl ContentFetcher {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size: batch_size.max(1) }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Fetch `requests` in batches of at most `batch_size`.
    ///
    /// Each batch completes before the next starts. A failure only affects
    /// its own file, which receives the fetch-error placeholder. `on_progress`
    /// is called once per finished batch.
    #[allow(clippy::too_many_arguments)]
    pub async fn fetch<S>(
        &self,
        source: &S,
        owner: &str,
        repo: &str,
        generation: u64,
        requests: &[FetchRequest],
        range: ProgressRange,
        mut on_progress: impl FnMut(ProgressUpdate),
    ) -> FetchOutcome
    where
        S: ContentSource + ?Sized,
    {
        let total = requests.len();
        let mut outcome = FetchOutcome { generation, contents: BTreeMap::new() };
        let mut completed = 0;

        for batch in requests.chunks(self.batch_size) {
            let results =
                join_all(batch.iter().map(|req| fetch_one(source, owner, repo, req))).await;
            for (request, content) in batch.iter().zip(results) {
                outcome.contents.insert(request.path.clone(), content);
            }

            completed += batch.len();
            on_progress(ProgressUpdate {
                percent: range.percent(completed, total),
                status: format!("Fetching content... ({}/{})", completed, total),
                completed,
                total,
            });
        }

        debug!("Fetched {} files from {} ({})", total, source.name(), generation);
        outcome
    }
}

impl Default for ContentFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_BATCH_SIZE)
    }
}

async fn fetch_one<S>(source: &S, owner: &str, repo: &str, request: &FetchRequest) -> String
where
    S: ContentSource + ?Sized,
{
    let raw = match source.file_content(owner, repo, &request.content_hash).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to fetch {}: {}", request.path, e);
            return FETCH_ERROR_PLACEHOLDER.to_string();
        }
    };

    if !notebook::is_notebook(&request.path) {
        return raw;
    }
    match notebook::linearize(&raw) {
        Ok(text) => text,
        Err(e) => {
            debug!("Keeping raw notebook {}: {}", request.path, e);
            raw
        }
    }
}
