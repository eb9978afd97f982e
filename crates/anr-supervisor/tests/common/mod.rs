//! Test doubles shared by the supervisor integration tests.

use anr_supervisor::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Fast configuration with a 10ms grace poll and a 1s escalation cap.
pub fn config(timeout_ms: u64, interval_ms: u64, grace_ms: u64) -> SupervisorResult<SupervisorConfig> {
    SupervisorConfig::builder()
        .timeout_check(Duration::from_millis(timeout_ms))
        .check_interval(Duration::from_millis(interval_ms))
        .false_positive_grace(Duration::from_millis(grace_ms))
        .max_escalation_wait(Duration::from_millis(1000))
        .grace_poll_interval(Duration::from_millis(10))
        .stop_confirm_delay(Duration::from_millis(50))
        .build()
}

/// Poll `condition` every 5ms until it holds or `within` elapses.
pub fn wait_until(within: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < within {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Terminator that records each call instead of ending the process.
#[derive(Debug, Clone, Default)]
pub struct RecordingTerminator {
    reports: Arc<Mutex<Vec<(Instant, UnresponsiveReport)>>>,
}

impl RecordingTerminator {
    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn first(&self) -> Option<(Instant, UnresponsiveReport)> {
        self.reports.lock().first().cloned()
    }
}

impl Terminator for RecordingTerminator {
    fn terminate_process_now(&self, report: &UnresponsiveReport) {
        self.reports.lock().push((Instant::now(), report.clone()));
    }
}

/// How a [`ScriptedTarget`] reacts to a posted probe.
#[derive(Debug, Clone, Copy)]
pub enum Response {
    /// Run the probe from a helper thread after the delay.
    After(Duration),
    /// Accept the probe and never run it.
    Never,
    /// Refuse the probe.
    Refuse,
}

#[derive(Default)]
struct Counters {
    posted: AtomicUsize,
    in_flight: AtomicUsize,
    overlaps: AtomicUsize,
    last_post: Mutex<Option<Instant>>,
    parked: Mutex<Vec<WorkItem>>,
}

/// Target context whose responsiveness is scripted by the test.
#[derive(Clone)]
pub struct ScriptedTarget {
    response: Response,
    counters: Arc<Counters>,
}

impl ScriptedTarget {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn posted(&self) -> usize {
        self.counters.posted.load(Ordering::SeqCst)
    }

    pub fn overlaps(&self) -> usize {
        self.counters.overlaps.load(Ordering::SeqCst)
    }

    pub fn last_post(&self) -> Option<Instant> {
        *self.counters.last_post.lock()
    }

    fn record_post(&self) {
        self.counters.posted.fetch_add(1, Ordering::SeqCst);
        *self.counters.last_post.lock() = Some(Instant::now());
    }
}

impl TargetScheduler for ScriptedTarget {
    fn post(&self, work: WorkItem) -> SupervisorResult<()> {
        match self.response {
            Response::Refuse => Err(SupervisorError::target_unavailable("scripted refusal")),
            Response::Never => {
                self.record_post();
                self.counters.parked.lock().push(work);
                Ok(())
            }
            Response::After(delay) => {
                self.record_post();
                if self.counters.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
                    self.counters.overlaps.fetch_add(1, Ordering::SeqCst);
                }
                let counters = Arc::clone(&self.counters);
                thread::spawn(move || {
                    thread::sleep(delay);
                    counters.in_flight.fetch_sub(1, Ordering::SeqCst);
                    work();
                });
                Ok(())
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
