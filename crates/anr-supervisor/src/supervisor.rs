//! Supervisor lifecycle.
//!
//! [`Supervisor`] is the context object the application builds once at its
//! composition root. It owns the configuration, the collaborators and at most
//! one worker thread. [`SupervisorCell`] gives "create once, reuse after"
//! semantics for callers that want a single supervisor per process.

use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

use crate::cancel::CancellationToken;
use crate::config::SupervisorConfig;
use crate::error::SupervisorResult;
use crate::state::SupervisorState;
use crate::stats::{StatsSnapshot, SupervisorStats};
use crate::target::{ProcessTerminator, TargetScheduler, Terminator};
use crate::worker::WatchdogWorker;

/// Name given to the worker thread.
pub const WORKER_THREAD_NAME: &str = "anr-supervisor";

pub(crate) struct Control {
    pub(crate) state: SupervisorState,
    pub(crate) run_id: u64,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

pub(crate) struct Shared {
    pub(crate) config: SupervisorConfig,
    pub(crate) control: Mutex<Control>,
    pub(crate) stats: SupervisorStats,
    pub(crate) target: Arc<dyn TargetScheduler>,
    pub(crate) terminator: Arc<dyn Terminator>,
}

/// Liveness supervisor for one target context.
///
/// # Lifecycle
///
/// - [`start`](Self::start) spawns the worker if none is running, or clears
///   a pending stop.
/// - [`stop`](Self::stop) is deferred: the worker finishes its current cycle
///   and then confirms the request after `stop_confirm_delay`. A `start()`
///   landing before that confirmation cancels the stop.
/// - [`interrupt`](Self::interrupt) cancels the worker at its next wait
///   boundary and joins it. Dropping the supervisor does the same.
///
/// # Example
///
/// ```rust
/// use anr_supervisor::prelude::*;
/// use std::time::Duration;
///
/// let dispatcher = MainThreadDispatcher::new("main");
/// let config = SupervisorConfig::builder()
///     .check_interval(Duration::from_millis(10))
///     .build()?;
/// let supervisor = Supervisor::with_target(config, dispatcher.handle())?;
///
/// supervisor.start()?;
/// assert_eq!(supervisor.state(), SupervisorState::Running);
///
/// supervisor.interrupt();
/// assert!(supervisor.is_stopped());
/// # Ok::<(), SupervisorError>(())
/// ```
pub struct Supervisor {
    shared: Arc<Shared>,
}

impl Supervisor {
    /// Create a stopped supervisor.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new<T, K>(config: SupervisorConfig, target: T, terminator: K) -> SupervisorResult<Self>
    where
        T: TargetScheduler + 'static,
        K: Terminator + 'static,
    {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                control: Mutex::new(Control {
                    state: SupervisorState::Stopped,
                    run_id: 0,
                    cancel: CancellationToken::new(),
                    handle: None,
                }),
                stats: SupervisorStats::new(),
                target: Arc::new(target),
                terminator: Arc::new(terminator),
            }),
        })
    }

    /// Create a stopped supervisor that aborts the process on a confirmed hang.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_target<T>(config: SupervisorConfig, target: T) -> SupervisorResult<Self>
    where
        T: TargetScheduler + 'static,
    {
        Self::new(config, target, ProcessTerminator)
    }

    /// Start supervising, or resume if a stop is pending.
    ///
    /// Calling this while already running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::SpawnFailed`](crate::SupervisorError::SpawnFailed)
    /// if the worker thread could not be created. The supervisor stays stopped.
    pub fn start(&self) -> SupervisorResult<()> {
        let mut control = self.shared.control.lock();
        match control.state {
            SupervisorState::Running => {
                tracing::debug!("Supervisor already running");
                Ok(())
            }
            SupervisorState::StopRequested => {
                control.state = SupervisorState::Running;
                self.shared.stats.inc_resumes();
                tracing::info!(run = control.run_id, "Pending stop cleared, supervision resumed");
                Ok(())
            }
            SupervisorState::Stopped | SupervisorState::Uninitialized => {
                self.spawn_worker(&mut control)
            }
        }
    }

    fn spawn_worker(&self, control: &mut Control) -> SupervisorResult<()> {
        // A previous worker that confirmed its stop never touches `control` again.
        if let Some(previous) = control.handle.take()
            && previous.join().is_err()
        {
            tracing::warn!("Previous supervisor thread panicked");
        }

        let cancel = CancellationToken::new();
        let run_id = control.run_id.saturating_add(1);
        let worker = WatchdogWorker::new(Arc::clone(&self.shared), cancel.clone(), run_id);

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => {
                control.state = SupervisorState::Running;
                control.run_id = run_id;
                control.cancel = cancel;
                control.handle = Some(handle);
                self.shared.stats.inc_runs_started();
                Ok(())
            }
            Err(err) => {
                control.state = SupervisorState::Stopped;
                tracing::error!(error = %err, "Failed to spawn supervisor thread");
                Err(err.into())
            }
        }
    }

    /// Request a deferred stop.
    ///
    /// The worker completes its current cycle, then stops if the request is
    /// still pending after `stop_confirm_delay`. No-op unless running.
    pub fn stop(&self) {
        let mut control = self.shared.control.lock();
        if control.state == SupervisorState::Running {
            control.state = SupervisorState::StopRequested;
            self.shared.stats.inc_stop_requests();
            tracing::info!(run = control.run_id, "Stop requested");
        } else {
            tracing::debug!(state = %control.state, "Stop ignored");
        }
    }

    /// Cancel the worker at its next wait boundary and wait for it to exit.
    ///
    /// A `start()` that races this call and spawns a new worker after the
    /// interrupted one exited is left running.
    pub fn interrupt(&self) {
        let (run_id, handle) = {
            let mut control = self.shared.control.lock();
            control.cancel.cancel();
            (control.run_id, control.handle.take())
        };

        if let Some(handle) = handle
            && handle.join().is_err()
        {
            tracing::warn!("Supervisor thread panicked");
        }

        let mut control = self.shared.control.lock();
        if control.run_id == run_id && control.state.is_active() {
            control.state = SupervisorState::Stopped;
        }
    }

    /// Whether the worker loop has fully exited.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state() == SupervisorState::Stopped
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SupervisorState {
        self.shared.control.lock().state
    }

    /// Configuration this supervisor was built with.
    #[must_use]
    pub fn config(&self) -> &SupervisorConfig {
        &self.shared.config
    }

    /// Name of the supervised context.
    #[must_use]
    pub fn target_name(&self) -> &str {
        self.shared.target.name()
    }

    /// Snapshot of the supervision counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.interrupt();
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let control = self.shared.control.lock();
        f.debug_struct("Supervisor")
            .field("config", &self.shared.config)
            .field("target", &self.shared.target.name())
            .field("state", &control.state)
            .field("run_id", &control.run_id)
            .finish_non_exhaustive()
    }
}

/// Holder for the one supervisor of a process.
///
/// Can live in a `static`:
///
/// ```rust
/// use anr_supervisor::prelude::*;
///
/// static SUPERVISOR: SupervisorCell = SupervisorCell::new();
///
/// assert_eq!(SUPERVISOR.state(), SupervisorState::Uninitialized);
/// let dispatcher = MainThreadDispatcher::new("main");
/// let handle = dispatcher.handle();
/// let supervisor = SUPERVISOR.get_or_create(|| {
///     Supervisor::with_target(SupervisorConfig::default(), handle)
/// })?;
/// assert!(supervisor.is_stopped());
/// # Ok::<(), SupervisorError>(())
/// ```
#[derive(Debug, Default)]
pub struct SupervisorCell {
    inner: OnceLock<Supervisor>,
}

impl SupervisorCell {
    /// Create an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Return the supervisor, creating it with `create` on first use.
    ///
    /// Later calls ignore `create`.
    ///
    /// # Errors
    ///
    /// Returns the error from `create` if the cell was empty and creation failed.
    pub fn get_or_create<F>(&self, create: F) -> SupervisorResult<&Supervisor>
    where
        F: FnOnce() -> SupervisorResult<Supervisor>,
    {
        if let Some(supervisor) = self.inner.get() {
            return Ok(supervisor);
        }
        let supervisor = create()?;
        Ok(self.inner.get_or_init(|| supervisor))
    }

    /// The supervisor, if created.
    #[must_use]
    pub fn get(&self) -> Option<&Supervisor> {
        self.inner.get()
    }

    /// Lifecycle state, `Uninitialized` until a supervisor is created.
    #[must_use]
    pub fn state(&self) -> SupervisorState {
        self.get().map_or(SupervisorState::Uninitialized, Supervisor::state)
    }
}
