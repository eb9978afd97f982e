//! Main-thread work queue.
//!
//! [`MainThreadDispatcher`] is owned by the thread being supervised, which
//! drains it once per iteration of its own loop. Any other thread enqueues
//! work through a cloneable [`DispatcherHandle`], which is also the
//! [`TargetScheduler`] handed to the supervisor.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{SupervisorError, SupervisorResult};
use crate::target::{TargetScheduler, WorkItem};

/// FIFO work queue drained by the supervised thread.
#[derive(Debug)]
pub struct MainThreadDispatcher {
    name: Arc<str>,
    sender: Sender<WorkItem>,
    receiver: Receiver<WorkItem>,
}

impl MainThreadDispatcher {
    /// Create an empty dispatcher for the context called `name`.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        let (sender, receiver) = channel::unbounded();
        Self {
            name: name.into(),
            sender,
            receiver,
        }
    }

    /// Name of the context draining this dispatcher.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a handle other threads can post work through.
    #[must_use]
    pub fn handle(&self) -> DispatcherHandle {
        DispatcherHandle {
            name: Arc::clone(&self.name),
            sender: self.sender.clone(),
        }
    }

    /// Number of queued work items.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Run every work item queued so far, in order.
    ///
    /// Items posted while draining are left for the next call.
    /// Returns the number of items run.
    pub fn run_pending(&self) -> usize {
        let queued = self.receiver.len();
        let mut ran = 0;
        for work in self.receiver.try_iter().take(queued) {
            work();
            ran += 1;
        }
        ran
    }

    /// Run work items as they arrive until `budget` has elapsed.
    ///
    /// Returns the number of items run.
    pub fn run_for(&self, budget: Duration) -> usize {
        let Some(deadline) = Instant::now().checked_add(budget) else {
            return self.run_pending();
        };
        let mut ran = 0;
        loop {
            match self.receiver.recv_deadline(deadline) {
                Ok(work) => {
                    work();
                    ran += 1;
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        ran
    }
}

/// Cloneable sender side of a [`MainThreadDispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    name: Arc<str>,
    sender: Sender<WorkItem>,
}

impl DispatcherHandle {
    /// Enqueue `work` on the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::TargetUnavailable`] if the dispatcher was dropped.
    pub fn enqueue(&self, work: impl FnOnce() + Send + 'static) -> SupervisorResult<()> {
        self.post(Box::new(work))
    }
}

impl TargetScheduler for DispatcherHandle {
    fn post(&self, work: WorkItem) -> SupervisorResult<()> {
        self.sender.send(work).map_err(|_closed| {
            SupervisorError::target_unavailable(format!("dispatcher '{}' was dropped", self.name))
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
