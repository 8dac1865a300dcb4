//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for posload using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Process exit codes shared by all commands
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const INPUT_NOT_FOUND: i32 = 3;
    pub const STORAGE_UNAVAILABLE: i32 = 4;
    pub const PARSE_ERROR: i32 = 5;
    pub const LOAD_ERROR: i32 = 6;
}

/// posload - POS export ingestion
#[derive(Parser, Debug)]
#[command(name = "posload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "posload.toml", env = "POSLOAD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "POSLOAD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest one POS export document into the configured database
    Ingest(commands::ingest::IngestArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show row counts of the loaded tables
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_ingest() {
        let cli = Cli::parse_from(["posload", "ingest"]);
        assert_eq!(cli.config, "posload.toml");
        match cli.command {
            Commands::Ingest(args) => {
                assert!(args.file.is_none());
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_ingest_with_file() {
        let cli = Cli::parse_from([
            "posload",
            "ingest",
            "--file",
            "input/Venue1_a.json",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Ingest(args) => {
                assert_eq!(
                    args.file.as_deref(),
                    Some(std::path::Path::new("input/Venue1_a.json"))
                );
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["posload", "--config", "custom.toml", "status"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["posload", "--log-level", "debug", "ingest"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["posload", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["posload", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => {
                assert!(args.force);
                assert_eq!(args.output, "posload.toml");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
