//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, PosloadConfig};
use crate::config::secret_string;
use crate::domain::errors::PosloadError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PosloadConfig
/// 4. Applies environment variable overrides (POSLOAD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use posload::config::loader::load_config;
///
/// let config = load_config("posload.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PosloadConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PosloadError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PosloadError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PosloadConfig = toml::from_str(&contents)
        .map_err(|e| PosloadError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PosloadError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PosloadError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PosloadError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the POSLOAD_* prefix
///
/// Environment variables follow the pattern: POSLOAD_<SECTION>_<KEY>
/// For example: POSLOAD_INPUT_DIRECTORY, POSLOAD_POSTGRESQL_CONNECTION_STRING
fn apply_env_overrides(config: &mut PosloadConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("POSLOAD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("POSLOAD_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Input overrides
    if let Ok(val) = std::env::var("POSLOAD_INPUT_DIRECTORY") {
        config.input.directory = val;
    }
    if let Ok(val) = std::env::var("POSLOAD_INPUT_FILE_PATTERN") {
        config.input.file_pattern = val;
    }

    if let Ok(val) = std::env::var("POSLOAD_DATABASE_TARGET") {
        config.database_target = match val.to_lowercase().as_str() {
            "postgresql" => DatabaseTarget::PostgreSQL,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(PosloadError::Configuration(format!(
                    "Invalid POSLOAD_DATABASE_TARGET '{other}'. Must be postgresql or memory"
                )))
            }
        };
    }

    // PostgreSQL overrides (only if the section is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("POSLOAD_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("POSLOAD_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg_config.max_connections = max;
            }
        }
        if let Ok(val) = std::env::var("POSLOAD_POSTGRESQL_SSL_MODE") {
            pg_config.ssl_mode = val;
        }
        if let Ok(val) = std::env::var("POSLOAD_POSTGRESQL_BOOTSTRAP_SCHEMA") {
            pg_config.bootstrap_schema = val.parse().unwrap_or(true);
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("POSLOAD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("POSLOAD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
