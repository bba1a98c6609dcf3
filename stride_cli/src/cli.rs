//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "stride", version, about = "Adaptive stepping over a range")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "stride.toml")]
    pub config: PathBuf,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Step across the configured range, evaluating a tanh front at each attempt
    Run {
        /// Width of the front as a fraction of the range
        #[arg(long, value_name = "FRAC", default_value_t = 0.01)]
        width: f64,
        /// Change in value that counts as an error of 1
        #[arg(long = "error-scale", value_name = "DELTA", default_value_t = 1e-2)]
        error_scale: f64,
        /// Abort after this many attempts
        #[arg(long = "max-attempts", value_name = "N")]
        max_attempts: Option<u64>,
        /// Print every recorded attempt, not just the summary
        #[arg(long, action = ArgAction::SetTrue)]
        attempts: bool,
    },
    /// Validate the config and build the stepper without running it
    Check,
}
