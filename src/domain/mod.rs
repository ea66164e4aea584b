//! Core data model shared across the pipeline.

mod chat;
mod config;
mod entry;
mod node;
mod stats;

pub use chat::{ChatMessage, Role, ScoredFile};
pub use config::{
    default_ignored_dirs, default_ignored_extensions, normalize_extension, Config, RankingWeights,
    DEFAULT_FETCH_BATCH_SIZE, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL, DEFAULT_GITHUB_API_URL,
    DEFAULT_MAX_AUTO_SELECT_BYTES,
};
pub use entry::{Entry, EntryKind, RepoDetails};
pub use node::{extension_of, FileTree, Node};
pub use stats::{ExtensionStat, ProcessingStats};

/// Placeholder stored for a file whose fetch failed.
pub const FETCH_ERROR_PLACEHOLDER: &str = "// Error fetching content";
/// Placeholder rendered for a selected file with no content available.
pub const MISSING_CONTENT_PLACEHOLDER: &str = "// Content not found";
/// Placeholder stored when fetched bytes cannot be decoded as text.
pub const UNDECODABLE_PLACEHOLDER: &str = "// Error decoding file content (might be binary)";
/// The entire content digest when no file is selected.
pub const NO_FILES_SELECTED: &str = "// No files selected.";
