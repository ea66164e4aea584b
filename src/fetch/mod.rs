//! Repository content retrieval (GitHub API, local directory)

pub mod batch;
pub mod github;
pub mod local;
pub mod notebook;
pub mod source;

pub use batch::{ContentFetcher, FetchOutcome, FetchRequest, ProgressRange, ProgressUpdate};
pub use github::GitHubSource;
pub use local::LocalSource;
pub use source::ContentSource;
