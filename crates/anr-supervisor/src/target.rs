//! Collaborators consumed by the worker.
//!
//! The supervisor knows nothing about the context it watches beyond
//! [`TargetScheduler`], and nothing about how the process ends beyond
//! [`Terminator`]. Both are implemented for plain closures so callers can
//! wire in an event loop or a test double without a newtype.

use serde::Serialize;
use std::time::Duration;

use crate::error::SupervisorResult;

/// A unit of work to run on the supervised context.
pub type WorkItem = Box<dyn FnOnce() + Send + 'static>;

/// Default name reported for a supervised context.
pub const DEFAULT_TARGET_NAME: &str = "main";

/// Work queue of the execution context under supervision.
pub trait TargetScheduler: Send + Sync {
    /// Enqueue `work` to run eventually on the supervised context.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::TargetUnavailable`](crate::SupervisorError::TargetUnavailable)
    /// if the queue can no longer accept work.
    fn post(&self, work: WorkItem) -> SupervisorResult<()>;

    /// Name of the supervised context, used in log output.
    fn name(&self) -> &str {
        DEFAULT_TARGET_NAME
    }
}

impl<F> TargetScheduler for F
where
    F: Fn(WorkItem) -> SupervisorResult<()> + Send + Sync,
{
    fn post(&self, work: WorkItem) -> SupervisorResult<()> {
        self(work)
    }
}

/// Details handed to the [`Terminator`] once unresponsiveness is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresponsiveReport {
    /// Name of the context that stopped responding.
    pub target: String,
    /// Cycle number of the unanswered probe, starting at 1.
    pub cycle: u64,
    /// Total time waited: the probe timeout plus the grace window.
    pub waited: Duration,
}

/// Corrective action for a confirmed unresponsive target.
pub trait Terminator: Send + Sync {
    /// End the process.
    ///
    /// Production implementations do not return. If an implementation does
    /// return, the worker stops supervising.
    fn terminate_process_now(&self, report: &UnresponsiveReport);
}

impl<F> Terminator for F
where
    F: Fn(&UnresponsiveReport) + Send + Sync,
{
    fn terminate_process_now(&self, report: &UnresponsiveReport) {
        self(report);
    }
}

/// Terminator that aborts the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate_process_now(&self, report: &UnresponsiveReport) {
        tracing::error!(
            target_context = %report.target,
            cycle = report.cycle,
            waited_ms = u64::try_from(report.waited.as_millis()).unwrap_or(u64::MAX),
            pid = std::process::id(),
            "Terminating unresponsive process"
        );
        std::process::abort();
    }
}
