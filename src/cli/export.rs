//! Export command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use super::utils::{open_workspace, runtime, SelectionArgs, SourceArgs};
use crate::render::{digest_file_name, render_markdown_tree};
use crate::utils::format_with_commas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DigestFormat {
    /// Header, directory tree and file contents
    Full,
    /// Directory tree only
    Tree,
    /// File contents only
    Content,
    /// Directory tree as Markdown headings
    Markdown,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// What to write
    #[arg(short = 'f', long, value_enum, default_value_t = DigestFormat::Full)]
    pub format: DigestFormat,

    /// Directory for the output file
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the digest to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let start_time = Instant::now();
    let needs_content = matches!(args.format, DigestFormat::Full | DigestFormat::Content);

    let config = args.source.load_config(args.source.overrides())?;
    let mut workspace = runtime()?.block_on(open_workspace(
        &args.source,
        &config,
        &args.selection,
        needs_content,
    ))?;

    let repo = workspace.repo().cloned().context("No repository was ingested")?;
    let markdown = render_markdown_tree(workspace.tree(), &repo.name);
    let digest = workspace.digest().context("No repository was ingested")?;

    let (text, file_name) = match args.format {
        DigestFormat::Full => (digest.full.clone(), digest_file_name(&repo)),
        DigestFormat::Tree => (digest.tree.clone(), format!("{}_tree.txt", repo.name)),
        DigestFormat::Content => (digest.content.clone(), format!("{}_content.txt", repo.name)),
        DigestFormat::Markdown => (markdown, format!("{}_tree.md", repo.name)),
    };

    if args.stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        return Ok(());
    }

    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let output_path = output_dir.join(file_name);
    fs::write(&output_path, &text)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!("{} {}", style("Wrote").green().bold(), output_path.display());
    println!("  Repository: {}", repo.slug());
    println!("  Files analyzed: {}", digest.files_analyzed);
    println!("  Estimated tokens: {}", format_with_commas(digest.estimated_tokens));
    println!("  Completed in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}
