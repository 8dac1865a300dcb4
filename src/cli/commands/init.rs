//! Init command implementation
//!
//! Writes a sample `posload.toml`.

use crate::cli::exit_code;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "posload.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing posload configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIG_ERROR);
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set POSLOAD_PG_DSN in your environment or a .env file");
                println!("  3. Validate configuration: posload validate-config");
                println!("  4. Drop an export into the input directory and run: posload ingest");
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(exit_code::CONFIG_ERROR)
            }
        }
    }
}

const SAMPLE_CONFIG: &str = r#"# posload configuration
#
# Values of the form ${VAR} are read from the environment (or .env).
# Any key can be overridden with POSLOAD_<SECTION>_<KEY>.

# Storage target: postgresql | memory
database_target = "postgresql"

[application]
log_level = "info"   # trace | debug | info | warn | error
dry_run = false      # parse and normalize only

[input]
directory = "input"
file_pattern = "Venue*_*.json"

[postgresql]
connection_string = "${POSLOAD_PG_DSN}"
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 120
ssl_mode = "prefer"  # disable | allow | prefer | require | verify-ca | verify-full
bootstrap_schema = true
insert_chunk_size = 1000

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"  # daily | hourly
"#;
