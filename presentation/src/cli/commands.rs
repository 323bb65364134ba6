//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for conversation transcripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every message of every conversation
    Full,
    /// Per-conversation counts and failures only
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for conclave
#[derive(Parser, Debug)]
#[command(name = "conclave")]
#[command(author, version, about = "Multi-agent conversations with ordered, one-at-a-time turns")]
#[command(long_about = r#"
Conclave runs several agent conversations side by side.

Within a conversation, agents speak strictly one at a time in the order
their turns were requested; each agent sees every message before its own.
Separate conversations proceed in parallel.

Configuration files are loaded from (in priority order):
1. CONCLAVE_* environment variables
2. --config <path>     Explicit config file
3. ./conclave.toml     Project-level config
4. ~/.config/conclave/config.toml   Global config

Example:
  conclave "Should we rewrite it in Rust?"
  conclave --conversations 4 --rounds 3 "Where should we go for lunch?"
  conclave -o json --no-config "Tabs or spaces?"
"#)]
pub struct Cli {
    /// Topic the agents discuss
    pub topic: Option<String>,

    /// Number of conversations to run side by side
    #[arg(short = 'n', long, default_value_t = 2, value_name = "N")]
    pub conversations: usize,

    /// Rounds per conversation (every agent speaks once per round)
    #[arg(short, long, default_value_t = 1, value_name = "R")]
    pub rounds: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["conclave", "lunch"]);
        assert_eq!(cli.topic.as_deref(), Some("lunch"));
        assert_eq!(cli.conversations, 2);
        assert_eq!(cli.rounds, 1);
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "conclave", "-n", "5", "--rounds", "3", "-o", "summary", "-vv", "--no-config",
        ]);
        assert!(cli.topic.is_none());
        assert_eq!(cli.conversations, 5);
        assert_eq!(cli.rounds, 3);
        assert_eq!(cli.output, OutputFormat::Summary);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
