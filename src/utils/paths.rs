//! Path normalization and repository reference parsing

use anyhow::{bail, Result};
use url::Url;

/// An `owner/repo` pair, optionally pinned to a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
}

/// Parse `owner/repo` or a GitHub URL.
///
/// Examples:
/// - `rust-lang/cargo`                                  → owner `rust-lang`, repo `cargo`
/// - `https://github.com/rust-lang/cargo.git`           → same, `.git` stripped
/// - `github.com/rust-lang/cargo/tree/master/src`       → branch `master`
pub fn parse_repo_ref(input: &str) -> Result<RepoRef> {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("Repository reference is empty");
    }

    if trimmed.contains("github.com") {
        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let url = Url::parse(&with_scheme)
            .map_err(|e| anyhow::anyhow!("Invalid GitHub URL {input:?}: {e}"))?;
        let parts: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();
        if parts.len() < 2 {
            bail!("GitHub URL {input:?} does not name an owner and repository");
        }
        let branch = match parts.get(2..4) {
            Some(["tree", branch]) => Some(branch.to_string()),
            _ => None,
        };
        return Ok(RepoRef {
            owner: parts[0].to_string(),
            repo: parts[1].trim_end_matches(".git").to_string(),
            branch,
        });
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok(RepoRef {
            owner: owner.to_string(),
            repo: repo.trim_end_matches(".git").to_string(),
            branch: None,
        }),
        _ => bail!("Please enter a valid GitHub URL or 'owner/repo' format (got {input:?})"),
    }
}
