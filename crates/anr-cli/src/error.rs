//! Error types for anrctl

use anr_supervisor::SupervisorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ValidationError(_)
            | CliError::JsonError(_)
            | CliError::Supervisor(SupervisorError::InvalidConfiguration(_)) => 4,
            CliError::Supervisor(SupervisorError::SpawnFailed(_)) => 5,
            CliError::IoError(_) | CliError::Supervisor(SupervisorError::TargetUnavailable(_)) => 1,
        }
    }
}
