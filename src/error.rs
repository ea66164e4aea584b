//! Error types for each pipeline layer.

use thiserror::Error;

/// Listing data that cannot be turned into a consistent tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("Invalid repository path {path:?}: empty path segment")]
    EmptySegment { path: String },

    #[error("Path {path:?} is listed as a {found} but an existing {existing} occupies it")]
    KindConflict { path: String, existing: &'static str, found: &'static str },

    #[error("Path {path:?} appears more than once in the repository listing")]
    DuplicatePath { path: String },

    #[error("Invalid exclude glob {pattern:?}: {message}")]
    InvalidGlob { pattern: String, message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No file or directory at {0:?}")]
    UnknownPath(String),
}

/// Failures reported by a content-retrieval collaborator.
///
/// The messages are user-facing and surfaced verbatim.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures of a single chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Answer generation unavailable: {0}")]
    Unavailable(String),

    #[error("Model API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected model response: {0}")]
    UnexpectedResponse(String),
}

/// Failures of a whole ingestion run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("No repository has been ingested yet")]
    NotIngested,
}
