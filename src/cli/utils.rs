//! Shared CLI arguments and session setup.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{normalize_extension, Config};
use crate::fetch::{ContentSource, GitHubSource, LocalSource, ProgressUpdate};
use crate::session::{Ingestor, Workspace, PROGRESS_STRUCTURE};
use crate::utils::parse_repo_ref;

/// Which repository to ingest, and how.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Local directory to ingest
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// GitHub repository: owner/repo or a github.com URL
    #[arg(short = 'r', long, value_name = "REPO")]
    pub repo: Option<String>,

    /// Branch to list instead of the default branch (with --repo)
    #[arg(long = "ref", value_name = "BRANCH")]
    pub ref_: Option<String>,

    /// Path to config file (repo-digest.toml or .repo-digest.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub token, raises the API rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// Files larger than this start unselected (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_auto_select_bytes: Option<u64>,

    /// Number of files fetched concurrently
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Exclude paths matching these globs (repeatable or comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS", value_delimiter = ',')]
    pub exclude_glob: Vec<String>,

    /// GitHub API base URL (GitHub Enterprise: https://HOST/api/v3)
    #[arg(long, value_name = "URL")]
    pub github_api_url: Option<String>,

    /// List files that .gitignore excludes (with --path)
    #[arg(long)]
    pub no_gitignore: bool,
}

/// Selection changes applied after the tree is built, in this order:
/// extension toggles, then selects, then deselects.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Select a file or directory (and everything under it)
    #[arg(long, value_name = "PATH")]
    pub select: Vec<String>,

    /// Deselect a file or directory (and everything under it)
    #[arg(long, value_name = "PATH")]
    pub deselect: Vec<String>,

    /// Toggle every file with this extension (repeatable or comma-separated)
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    pub toggle_ext: Vec<String>,
}

impl SelectionArgs {
    pub fn apply(&self, workspace: &mut Workspace) -> Result<()> {
        for ext in &self.toggle_ext {
            let ext = normalize_extension(ext);
            match workspace.toggle_extension(&ext) {
                Some(state) => tracing::debug!("{} -> {}", ext, state),
                None => {
                    eprintln!("{} no files with extension {}", style("warning:").yellow(), ext)
                }
            }
        }
        for path in &self.select {
            workspace.toggle(path.trim_matches('/'), true).context("--select")?;
        }
        for path in &self.deselect {
            workspace.toggle(path.trim_matches('/'), false).context("--deselect")?;
        }
        Ok(())
    }
}

/// A content source plus the owner/repo names it answers to.
pub struct Target {
    pub source: Box<dyn ContentSource>,
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
}

impl SourceArgs {
    /// Command-line values for the config override layer.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            max_auto_select_bytes: self.max_auto_select_bytes,
            fetch_batch_size: self.batch_size,
            exclude_globs: self.exclude_glob.clone(),
            github_api_url: self.github_api_url.clone(),
            gemini_model: None,
        }
    }

    /// File and environment config with `overrides` on top.
    pub fn load_config(&self, overrides: CliOverrides) -> Result<Config> {
        let cwd = std::env::current_dir()?;
        let anchor = match self.path.as_ref() {
            Some(path) if path.is_dir() => path.canonicalize().unwrap_or_else(|_| cwd.clone()),
            _ => cwd,
        };
        let file_config = load_config(&anchor, self.config.as_deref())?;

        Ok(merge_cli_with_config(file_config, overrides))
    }

    pub fn target(&self, config: &Config) -> Result<Target> {
        if self.path.is_some() && self.repo.is_some() {
            anyhow::bail!("Cannot specify both --path and --repo");
        }
        if let Some(path) = &self.path {
            let source = LocalSource::open(path)
                .with_context(|| format!("Cannot open {}", path.display()))?
                .respect_gitignore(!self.no_gitignore);
            let repo = source
                .root()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Ok(Target {
                source: Box::new(source),
                owner: "local".into(),
                repo,
                branch: None,
            });
        }

        let Some(reference) = &self.repo else {
            anyhow::bail!("Either --path or --repo must be specified");
        };
        let repo_ref = parse_repo_ref(reference)?;
        let source =
            GitHubSource::with_base_url(&config.github_api_url, self.github_token.clone())?;
        if !source.is_authenticated() {
            tracing::debug!("No GitHub token; unauthenticated rate limits apply");
        }
        Ok(Target {
            source: Box::new(source),
            owner: repo_ref.owner,
            repo: repo_ref.repo,
            branch: self.ref_.clone().or(repo_ref.branch),
        })
    }
}

pub fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos:>3}% {msg}")?
            .progress_chars("##-"),
    );
    Ok(bar)
}

pub fn report(bar: &ProgressBar) -> impl FnMut(ProgressUpdate) + '_ {
    move |update| {
        bar.set_position(u64::from(update.percent));
        bar.set_message(update.status);
    }
}

pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// List the repository, build the tree and apply `selection`.
/// When `with_content` is set, content for the final selection is fetched too.
pub async fn open_workspace(
    args: &SourceArgs,
    config: &Config,
    selection: &SelectionArgs,
    with_content: bool,
) -> Result<Workspace> {
    let target = args.target(config)?;
    let ingestor = Ingestor::new(target.source.as_ref(), config);
    let mut workspace = Workspace::new();

    let bar = progress_bar()?;
    ingestor
        .load(&mut workspace, &target.owner, &target.repo, target.branch.as_deref(), report(&bar))
        .await
        .with_context(|| format!("Failed to ingest {}/{}", target.owner, target.repo))?;
    selection.apply(&mut workspace)?;

    if with_content {
        ingestor.refresh_from(&mut workspace, PROGRESS_STRUCTURE, report(&bar)).await?;
    }
    bar.finish_and_clear();
    drop(ingestor);

    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        source: SourceArgs,
    }

    #[test]
    fn test_overrides_carry_source_flags() {
        let args = Harness::try_parse_from([
            "repo-digest",
            "--repo",
            "octo/demo",
            "--github-api-url",
            "https://ghe.example.com/api/v3",
            "--batch-size",
            "3",
            "-e",
            "docs/**,*.snap",
        ])
        .expect("valid arguments")
        .source;

        let overrides = args.overrides();
        assert_eq!(overrides.github_api_url.as_deref(), Some("https://ghe.example.com/api/v3"));
        assert_eq!(overrides.fetch_batch_size, Some(3));
        assert_eq!(overrides.exclude_globs, vec!["docs/**".to_string(), "*.snap".to_string()]);
        assert_eq!(overrides.gemini_model, None);
    }
}
