//! Configuration loading and inspection commands

use anr_supervisor::SupervisorConfig;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::commands::ConfigCommands;
use crate::error::CliError;
use crate::output;

/// Execute configuration commands
pub fn execute(cmd: &ConfigCommands, json: bool) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            output::print_config(&SupervisorConfig::default(), json);
            Ok(())
        }
        ConfigCommands::Check { path } => {
            let config = load_config(path)?;
            output::print_config(&config, json);
            Ok(())
        }
    }
}

/// Read a JSON configuration file and validate it.
///
/// Missing fields fall back to the defaults.
pub fn load_config(path: &Path) -> Result<SupervisorConfig, CliError> {
    debug!(path = %path.display(), "Loading supervisor configuration");
    let contents = std::fs::read_to_string(path)?;
    let config: SupervisorConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
