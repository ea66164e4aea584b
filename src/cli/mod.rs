//! Command-line interface for repo-digest
//!
//! Provides `export`, `info`, `ask` and `completions` subcommands.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod ask;
mod export;
mod info;
mod utils;

/// Turn repositories into selectable, size-bounded digests for LLMs
#[derive(Parser)]
#[command(name = "repo-digest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a repository digest to a file or stdout
    Export(Box<export::ExportArgs>),

    /// Show repository details, selection statistics and the tree
    Info(Box<info::InfoArgs>),

    /// Ask questions about a repository
    Ask(Box<ask::AskArgs>),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Export(args) => export::run(*args),
        Commands::Info(args) => info::run(*args),
        Commands::Ask(args) => ask::run(*args),
        Commands::Completions { shell } => {
            let mut out = std::io::stdout();
            clap_complete::generate(shell, &mut Cli::command(), "repo-digest", &mut out);
            Ok(())
        }
    }
}
