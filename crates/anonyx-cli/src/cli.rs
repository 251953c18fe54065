//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Anonymize free text with casing-aware entity placeholders.
#[derive(Debug, Parser)]
#[command(name = "anonyx", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to $ANONYX_CONFIG, then ./anonyx.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace detected entities with placeholders
    #[command(visible_alias = "a")]
    Anonymize {
        #[command(flatten)]
        input: InputArgs,

        /// Append the entity report
        #[arg(long)]
        report: bool,

        /// Print the full result as JSON
        #[arg(long, conflicts_with = "report")]
        json: bool,
    },

    /// List detected entities and their placeholders
    #[command(visible_alias = "d")]
    Detect {
        #[command(flatten)]
        input: InputArgs,

        /// Print spans as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where the text comes from; stdin when neither is given.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Text to process
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_anonymize() {
        let cli = Cli::try_parse_from(["anonyx", "--config", "a.toml", "anonymize", "John", "--report"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        match cli.command {
            Commands::Anonymize { input, report, json } => {
                assert_eq!(input.text.as_deref(), Some("John"));
                assert!(report);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_text_and_file_conflict() {
        assert!(Cli::try_parse_from(["anonyx", "detect", "John", "--file", "in.txt"]).is_err());
    }
}
