//! CLI module - Command-line interface for task-reminder
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};

/// task-reminder - Slack slash-command task bot
#[derive(Parser)]
#[command(name = "task-reminder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve the Slack receiver and task API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Validate config and check the database is reachable
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["task-reminder"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn daemon_is_an_alias_for_serve() {
        let cli = Cli::try_parse_from(["task-reminder", "daemon"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
    }

    #[test]
    fn unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["task-reminder", "frobnicate"]).is_err());
    }
}
