//! repo-digest command-line entry point

use anyhow::Result;

fn main() -> Result<()> {
    repo_digest::cli::run()
}
