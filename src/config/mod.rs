//! Configuration: `repo-digest.toml` / `.yml`, `REPO_DIGEST_*` environment
//! variables, then command-line flags, each layer overriding the previous one.

pub mod loader;
pub mod merge;

pub use loader::{load_config, ENV_PREFIX};
pub use merge::{merge_cli_with_config, CliOverrides};
