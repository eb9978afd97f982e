//! Error types for the supervisor.
//!
//! None of these errors ever escape the worker thread. They describe
//! configuration mistakes, a target context that refused a probe, and
//! the OS refusing to give us a thread.

use thiserror::Error;

/// Errors that can occur while configuring or driving the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupervisorError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The supervised context could not accept a unit of work.
    #[error("Target context unavailable: {0}")]
    TargetUnavailable(String),

    /// The worker thread could not be spawned.
    #[error("Failed to spawn supervisor thread: {0}")]
    SpawnFailed(String),
}

impl SupervisorError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create a target unavailable error.
    #[must_use]
    pub fn target_unavailable(reason: impl Into<String>) -> Self {
        Self::TargetUnavailable(reason.into())
    }

    /// Create a spawn failed error.
    #[must_use]
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed(reason.into())
    }
}

impl From<std::io::Error> for SupervisorError {
    fn from(err: std::io::Error) -> Self {
        Self::spawn_failed(err.to_string())
    }
}

/// A specialized `Result` type for supervisor operations.
pub type SupervisorResult<T> = std::result::Result<T, SupervisorError>;
