//! Ask command: questions about a repository, answered by Gemini

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::IsTerminal;

use super::utils::{open_workspace, runtime, SelectionArgs, SourceArgs};
use crate::chat::{Analyst, GeminiModel};
use crate::config::CliOverrides;
use crate::domain::{ChatMessage, Config};
use crate::session::Workspace;

#[derive(Args)]
pub struct AskArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Question to ask; omit for an interactive session
    #[arg(short = 'q', long, value_name = "TEXT")]
    pub question: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,
}

pub fn run(args: AskArgs) -> Result<()> {
    if args.question.is_none() && !std::io::stdin().is_terminal() {
        anyhow::bail!("--question is required when stdin is not a terminal");
    }
    let rt = runtime()?;

    // Fail on a missing key before spending API calls on ingestion.
    let config = ask_config(&args)?;
    let model = GeminiModel::with_options(
        args.gemini_api_key.clone(),
        &config.gemini_api_url,
        &config.gemini_model,
    )
    .context("Cannot answer questions")?;

    let mut workspace =
        rt.block_on(open_workspace(&args.source, &config, &args.selection, true))?;
    let analyst = Analyst::new(model, config.ranking.clone());

    if let Some(question) = &args.question {
        let reply = rt.block_on(ask_one(&analyst, &mut workspace, question));
        print_reply(&reply);
        if reply.is_error {
            anyhow::bail!("the model did not answer");
        }
        return Ok(());
    }

    let repo = workspace.repo().map(|r| r.slug()).unwrap_or_default();
    eprintln!(
        "{} {} (empty line or 'exit' to quit)",
        style("Chatting about").bold(),
        style(&repo).cyan()
    );
    loop {
        let question: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("?")
            .allow_empty(true)
            .interact_text()?;
        let question = question.trim();
        if question.is_empty() || question == "exit" || question == "quit" {
            break;
        }
        let reply = rt.block_on(ask_one(&analyst, &mut workspace, question));
        print_reply(&reply);
    }
    Ok(())
}

/// Config with `--model` applied through the same override layer as the other flags.
fn ask_config(args: &AskArgs) -> Result<Config> {
    args.source.load_config(CliOverrides {
        gemini_model: args.model.clone(),
        ..args.source.overrides()
    })
}

async fn ask_one(
    analyst: &Analyst<GeminiModel>,
    workspace: &mut Workspace,
    question: &str,
) -> ChatMessage {
    let tree_digest = workspace.digest().map(|d| d.tree.clone()).unwrap_or_default();
    let (tree, chat) = workspace.chat_parts();
    chat.ask(analyst, tree, &tree_digest, question).await.clone()
}

fn print_reply(reply: &ChatMessage) {
    if reply.is_error {
        eprintln!("{}", style(&reply.text).red());
        return;
    }
    println!("{}", reply.text);
    if !reply.relevant_files.is_empty() {
        println!("\n{}", style("Context files:").dim());
        for file in &reply.relevant_files {
            println!("  {} ({})", style(&file.path).dim(), file.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        ask: AskArgs,
    }

    fn parse(args: &[&str]) -> AskArgs {
        let argv = std::iter::once("ask").chain(args.iter().copied());
        Harness::try_parse_from(argv).expect("valid arguments").ask
    }

    #[test]
    fn test_model_flag_overrides_config_file() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("repo-digest.toml"), "gemini_model = \"file-model\"\n")
            .expect("write config");
        let root = tmp.path().to_str().expect("utf8 path");

        let config = ask_config(&parse(&["--path", root])).expect("config");
        assert_eq!(config.gemini_model, "file-model");

        let args = parse(&["--path", root, "--model", "flag-model"]);
        let config = ask_config(&args).expect("config");
        assert_eq!(config.gemini_model, "flag-model");
    }
}
