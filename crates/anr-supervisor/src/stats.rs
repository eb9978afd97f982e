//! Supervision statistics.
//!
//! Counters are plain relaxed atomics: they are written by the worker and
//! the lifecycle entry points, and only ever read as an eventually
//! consistent [`StatsSnapshot`].

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Point-in-time copy of [`SupervisorStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Worker threads started.
    pub runs_started: u64,
    /// Probe cycles begun.
    pub cycles: u64,
    /// Probes accepted by the target scheduler.
    pub probes_posted: u64,
    /// Probes the target scheduler refused.
    pub post_failures: u64,
    /// Probes answered within the probe timeout.
    pub responsive: u64,
    /// Probes that missed the probe timeout.
    pub unresponsive: u64,
    /// Timed-out probes answered inside the grace window.
    pub false_positives: u64,
    /// Times the terminator was invoked.
    pub terminations: u64,
    /// Stop requests accepted while running.
    pub stop_requests: u64,
    /// Pending stops cleared by `start()`.
    pub resumes: u64,
    /// Worker loops ended by cancellation.
    pub interruptions: u64,
    /// Response latency of the last answered probe, in microseconds.
    pub last_latency_us: u64,
}

impl StatsSnapshot {
    /// Response latency of the last answered probe.
    #[must_use]
    pub fn last_latency(&self) -> Duration {
        Duration::from_micros(self.last_latency_us)
    }
}

/// Atomic counters maintained by a supervisor.
#[derive(Debug, Default)]
pub struct SupervisorStats {
    runs_started: AtomicU64,
    cycles: AtomicU64,
    probes_posted: AtomicU64,
    post_failures: AtomicU64,
    responsive: AtomicU64,
    unresponsive: AtomicU64,
    false_positives: AtomicU64,
    terminations: AtomicU64,
    stop_requests: AtomicU64,
    resumes: AtomicU64,
    interruptions: AtomicU64,
    last_latency_us: AtomicU64,
}

impl SupervisorStats {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc_runs_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the cycle counter and return the new cycle number.
    pub(crate) fn next_cycle(&self) -> u64 {
        self.cycles.fetch_add(1, Ordering::Relaxed).saturating_add(1)
    }

    pub(crate) fn record_post(&self, accepted: bool) {
        if accepted {
            self.probes_posted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.post_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_response(&self, latency: Duration) {
        self.responsive.fetch_add(1, Ordering::Relaxed);
        self.store_latency(latency);
    }

    pub(crate) fn record_unresponsive(&self) {
        self.unresponsive.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_false_positive(&self, latency: Duration) {
        self.false_positives.fetch_add(1, Ordering::Relaxed);
        self.store_latency(latency);
    }

    pub(crate) fn inc_terminations(&self) {
        self.terminations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_stop_requests(&self) {
        self.stop_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_resumes(&self) {
        self.resumes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_interruptions(&self) {
        self.interruptions.fetch_add(1, Ordering::Relaxed);
    }

    fn store_latency(&self, latency: Duration) {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.last_latency_us.store(micros, Ordering::Relaxed);
    }

    /// Take a snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            runs_started: self.runs_started.load(Ordering::Relaxed),
            cycles: self.cycles.load(Ordering::Relaxed),
            probes_posted: self.probes_posted.load(Ordering::Relaxed),
            post_failures: self.post_failures.load(Ordering::Relaxed),
            responsive: self.responsive.load(Ordering::Relaxed),
            unresponsive: self.unresponsive.load(Ordering::Relaxed),
            false_positives: self.false_positives.load(Ordering::Relaxed),
            terminations: self.terminations.load(Ordering::Relaxed),
            stop_requests: self.stop_requests.load(Ordering::Relaxed),
            resumes: self.resumes.load(Ordering::Relaxed),
            interruptions: self.interruptions.load(Ordering::Relaxed),
            last_latency_us: self.last_latency_us.load(Ordering::Relaxed),
        }
    }
}
