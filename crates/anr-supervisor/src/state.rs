//! Supervisor lifecycle and per-cycle escalation states.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a supervisor.
///
/// # State Transition Diagram
///
/// ```text
///              start()                 stop()
/// Stopped ───────────────► Running ───────────────► StopRequested
///    ▲                        ▲                          │
///    │                        └────── start() ───────────┤
///    │                               (resume)            │
///    └───────────── worker confirms stop ────────────────┘
/// ```
///
/// `interrupt()` moves any running state straight to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupervisorState {
    /// No supervisor has been created yet.
    #[default]
    Uninitialized,
    /// The worker loop is executing.
    Running,
    /// A stop was requested; the worker has not yet confirmed it.
    StopRequested,
    /// The worker loop is not executing.
    Stopped,
}

impl SupervisorState {
    /// Whether a worker loop is executing in this state.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::StopRequested)
    }

    /// Get the state as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Running => "Running",
            Self::StopRequested => "StopRequested",
            Self::Stopped => "Stopped",
        }
    }
}

impl std::fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Escalation phase of a single probe cycle.
///
/// ```text
/// Idle ──post──► AwaitingProbe ──timeout──► Escalating ──grace elapsed──► Fatal
///                     │                          │
///                  signaled                   signaled
///                     ▼                          ▼
///                 responsive               false positive
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EscalationPhase {
    /// No probe posted yet.
    #[default]
    Idle,
    /// Probe posted, waiting up to the probe timeout.
    AwaitingProbe,
    /// Probe timed out, polling through the grace window.
    Escalating,
    /// Grace window elapsed without a signal.
    Fatal,
}

impl EscalationPhase {
    /// Get the phase as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitingProbe => "AwaitingProbe",
            Self::Escalating => "Escalating",
            Self::Fatal => "Fatal",
        }
    }
}

impl std::fmt::Display for EscalationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(SupervisorState::Running.is_active());
        assert!(SupervisorState::StopRequested.is_active());
        assert!(!SupervisorState::Stopped.is_active());
        assert!(!SupervisorState::Uninitialized.is_active());
    }

    #[test]
    fn test_display() {
        assert_eq!(SupervisorState::StopRequested.to_string(), "StopRequested");
        assert_eq!(EscalationPhase::AwaitingProbe.to_string(), "AwaitingProbe");
        assert_eq!(SupervisorState::default(), SupervisorState::Uninitialized);
    }
}
