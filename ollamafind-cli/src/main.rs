use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ollamafind::{FinderConfig, FsStorage, Locator, ModelReference};

const AFTER_HELP: &str = "\
Usage:
  $  ollama-find llama3
  ~/.ollama/models/blobs/sha256-6a0746a1ec1aef3e7ec53868f220ff6e389f6f8ef87a01d77c96807de94ca2aa

  $  ollama-find deepseek-r1:7b
  $  ollama-find deepseek-r1 7b
  $  ollama-find registry.example.com/team/model v2";

/// ollama::find
///
/// A CLI tool that allows you to quickly generate a path to a gguf file
/// that's been pulled via Ollama.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about, after_help = AFTER_HELP)]
struct Cli {
    /// Model name, optionally with a tag (`name:tag`)
    model: Option<String>,

    /// Tag to look up, ignored when the model name carries one
    tag: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let model = match cli.model.as_deref() {
        None | Some("help") => {
            Cli::command().print_long_help()?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(model) => model,
    };

    let config = FinderConfig::load().context("failed to load configuration")?;
    let locator = Locator::from_config(&config, FsStorage::new())
        .context("failed to set up the model cache location")?;

    let reference = ModelReference::parse(model, cli.tag.as_deref().unwrap_or_default());
    debug!("looking up {}", reference);

    match locator.resolve(&reference) {
        Ok(path) => {
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["ollama-find", "deepseek-r1", "7b"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("deepseek-r1"));
        assert_eq!(cli.tag.as_deref(), Some("7b"));
        assert!(!cli.verbose);

        let cli = Cli::try_parse_from(["ollama-find"]).unwrap();
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_help_flags() {
        for flag in ["-h", "--help"] {
            let err = Cli::try_parse_from(["ollama-find", flag]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        }
    }
}
