// posload - POS export ingestion into PostgreSQL
// Copyright (c) 2025 posload Contributors
// Licensed under the MIT License

use posload::cli::{exit_code, Cli, Commands};
use posload::config::{load_config, LoggingConfig};
use posload::logging::init_logging;
use clap::Parser;
use std::process;

/// Exit code after SIGINT/SIGTERM (128 + SIGINT)
const INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging follows the config when it loads; errors are reported
    // by the command itself
    let (config_level, logging_config) = match load_config(&cli.config) {
        Ok(config) => (Some(config.application.log_level), config.logging),
        Err(_) => (None, LoggingConfig::console_only()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit_code::CONFIG_ERROR);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "posload starting");

    // Dropping the command future closes any open storage transaction,
    // which the server rolls back
    let code = tokio::select! {
        result = execute_command(&cli) => match result {
            Ok(code) => code,
            Err(e) => {
                tracing::error!(error = %e, "Command execution failed");
                eprintln!("Error: {e}");
                exit_code::PARSE_ERROR
            }
        },
        _ = shutdown_signal() => {
            tracing::warn!("Shutdown signal received, abandoning current run");
            println!("\n⚠️  Interrupted; nothing from this run was committed");
            INTERRUPTED
        }
    };

    drop(guard);
    process::exit(code);
}

async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Ingest(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        if result.is_err() {
                            sigterm.recv().await;
                        }
                    }
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
