//! Command implementations for anrctl

pub mod config;
pub mod run;

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for `anrctl run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON configuration file; flags below override its values
    #[arg(long, env = "ANRCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Probe timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Interval between probes in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// False positive grace window in milliseconds
    #[arg(long)]
    pub grace_ms: Option<u64>,

    /// Upper clamp on the grace window in milliseconds
    #[arg(long)]
    pub max_escalation_ms: Option<u64>,

    /// How long to drive the main loop, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub duration_ms: u64,

    /// Main loop frame budget in milliseconds
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Stop draining the main loop after this many milliseconds
    #[arg(long)]
    pub hang_after_ms: Option<u64>,

    /// Request a deferred stop after this many milliseconds
    #[arg(long)]
    pub stop_after_ms: Option<u64>,
}

/// Configuration commands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the default configuration
    Show,

    /// Load and validate a JSON configuration file
    Check {
        /// Path to the configuration file
        path: PathBuf,
    },
}
