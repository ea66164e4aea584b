//! Info command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use super::utils::{open_workspace, runtime, SelectionArgs, SourceArgs};
use crate::utils::format_with_commas;

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Number of extensions listed
    #[arg(long, value_name = "N", default_value_t = 15)]
    pub top_extensions: usize,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let config = args.source.load_config(args.source.overrides())?;
    let mut workspace =
        runtime()?.block_on(open_workspace(&args.source, &config, &args.selection, false))?;

    let repo = workspace.repo().cloned().context("No repository was ingested")?;
    println!("{} {}", style("Repository:").bold(), repo.slug());
    if !repo.description.is_empty() {
        println!("  {}", repo.description);
    }
    println!("  Branch: {}", repo.default_branch);
    println!("  Stars: {}", format_with_commas(repo.stars));

    let stats = workspace.processing_stats();
    println!("{}", style("Statistics:").bold());
    println!("  Files listed: {}", stats.total_files);
    println!("  Files selected: {}", stats.selected_files);
    println!("  Selected bytes: {}", format_with_commas(stats.total_size));
    println!("  Estimated tokens: {}", format_with_commas(stats.estimated_tokens));

    let extensions = workspace.extension_stats();
    if !extensions.is_empty() {
        println!("{}", style("Extensions:").bold());
        for ext in extensions.iter().take(args.top_extensions) {
            let marker = if ext.fully_selected() {
                style("✓").green()
            } else if ext.selected == 0 {
                style("✗").red()
            } else {
                style("~").yellow()
            };
            println!("  {} {:<12} {}/{} selected", marker, ext.extension, ext.selected, ext.count);
        }
    }

    let digest = workspace.digest().context("No repository was ingested")?;
    println!("\n{}", digest.tree);
    Ok(())
}
