//! CLI module for Inquestor.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Inquestor - research assistant
///
/// Ask about any topic. The agent can consult Wikipedia, search the web,
/// and save its findings to a text file.
#[derive(Parser, Debug)]
#[command(name = "inquestor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "INQUESTOR_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a topic (prompts for the query when none is given)
    Research {
        /// What to research
        query: Option<String>,

        /// Append the output to the research log
        #[arg(long, conflicts_with = "no_save")]
        save: bool,

        /// Do not append the output to the research log
        #[arg(long)]
        no_save: bool,

        /// Print the agent's raw text only
        #[arg(long, conflicts_with = "json")]
        raw: bool,

        /// Print the JSON export instead of the rendered result
        #[arg(long)]
        json: bool,
    },

    /// Start the web form and JSON API
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8501")]
        port: u16,
    },

    /// Check API key, configuration and log file
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_research_flags() {
        let cli = Cli::parse_from(["inquestor", "-vv", "research", "quantum dots", "--no-save", "--json"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Research { query, save, no_save, raw, json } => {
                assert_eq!(query.as_deref(), Some("quantum dots"));
                assert!(!save);
                assert!(no_save);
                assert!(!raw);
                assert!(json);
            }
            _ => panic!("Expected Research command"),
        }
    }

    #[test]
    fn test_research_query_is_optional() {
        let cli = Cli::parse_from(["inquestor", "research"]);
        assert!(matches!(cli.command, Commands::Research { query: None, .. }));
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        assert!(Cli::try_parse_from(["inquestor", "research", "q", "--raw", "--json"]).is_err());
        assert!(Cli::try_parse_from(["inquestor", "research", "q", "--save", "--no-save"]).is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["inquestor", "serve"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8501);
            }
            _ => panic!("Expected Serve command"),
        }
    }
}
