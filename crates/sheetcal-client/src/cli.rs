//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::EndpointOverrides;

/// sheetcal - Push a spreadsheet to a calendar endpoint as CSV
#[derive(Debug, Parser)]
#[command(name = "sheetcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SHEETCAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit JSON logs with timestamps (for cron jobs and timers)
    #[arg(long, global = true)]
    pub json_logs: bool,

    // --- Endpoint flags ---
    /// Base address of the endpoint (requests go to <BASE_ADDRESS>/update)
    #[arg(long, env = "SHEETCAL_BASE_ADDRESS", global = true)]
    pub base_address: Option<String>,

    /// Shared secret sent as the x-api-key header
    #[arg(long, env = "SHEETCAL_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the endpoint values given on the command line.
    pub fn endpoint_overrides(&self) -> EndpointOverrides {
        EndpointOverrides {
            base_address: self.base_address.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the sheet, send it to the endpoint and log the response (default)
    Push {
        /// CSV export of the sheet (`-` for stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Print the CSV document without sending it
    Encode {
        /// CSV export of the sheet (`-` for stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Print the JSON request body instead of the CSV document
        #[arg(long)]
        envelope: bool,
    },

    /// Build an iCalendar file from a schedule
    Render {
        /// Schedule CSV, or a request body with --envelope (`-` for stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Treat the input as a JSON request body
        #[arg(long)]
        envelope: bool,

        /// Output file (defaults to <output_dir>/<name>.ics)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run the receiving endpoint: accept updates, serve the calendar
    Serve {
        /// Address to listen on (defaults to [receiver] listen)
        #[arg(long, short)]
        listen: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
