//! One-shot liveness probe.
//!
//! A [`Probe`] is posted onto the supervised context's work queue. When that
//! context runs it, the probe records the fact and wakes the worker waiting on
//! it. The wait itself never reports *why* it returned: callers must check
//! [`Probe::is_called`] afterwards, which also covers a probe executed a moment
//! after the wait bound elapsed.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::target::WorkItem;

/// Single-use rendezvous token between the worker and the supervised context.
#[derive(Debug)]
pub struct Probe {
    created_at: Instant,
    called_at: Mutex<Option<Instant>>,
    signal: Condvar,
}

impl Probe {
    /// Create a fresh, uncalled probe.
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Instant::now(),
            called_at: Mutex::new(None),
            signal: Condvar::new(),
        }
    }

    /// Mark the probe as executed and wake every waiter.
    ///
    /// Only the first call is recorded.
    pub fn execute(&self) {
        let mut called_at = self.called_at.lock();
        if called_at.is_none() {
            *called_at = Some(Instant::now());
        }
        self.signal.notify_all();
    }

    /// Whether [`execute`](Self::execute) has run.
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.called_at.lock().is_some()
    }

    /// Block until the probe is executed or `timeout` elapses.
    pub fn wait_for_signal(&self, timeout: Duration) {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            let mut called_at = self.called_at.lock();
            while called_at.is_none() {
                self.signal.wait(&mut called_at);
            }
            return;
        };

        let mut called_at = self.called_at.lock();
        while called_at.is_none() {
            if self.signal.wait_until(&mut called_at, deadline).timed_out() {
                break;
            }
        }
    }

    /// Time between creation and execution, if the probe ran.
    #[must_use]
    pub fn response_latency(&self) -> Option<Duration> {
        self.called_at
            .lock()
            .map(|called_at| called_at.saturating_duration_since(self.created_at))
    }

    /// Time since the probe was created.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Wrap the probe in a one-shot work item for a
    /// [`TargetScheduler`](crate::TargetScheduler).
    #[must_use]
    pub fn work_item(self: &Arc<Self>) -> WorkItem {
        let probe = Arc::clone(self);
        Box::new(move || probe.execute())
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}
