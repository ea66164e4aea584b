//! repo-digest: turn repositories into selectable, size-bounded digests
//!
//! A repository listing (GitHub API or a local directory) becomes a
//! selectable tree. Selected file contents are fetched in batches and
//! rendered into text digests for pasting into LLM prompts, or ranked
//! against a question and sent to Gemini.

pub mod chat;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod rank;
pub mod render;
pub mod scan;
pub mod select;
pub mod session;
pub mod utils;
