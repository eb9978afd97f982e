//! The supervision loop.
//!
//! One [`WatchdogWorker`] runs per started supervisor, on its own thread. Each
//! cycle sleeps for the check interval, posts a fresh [`Probe`] and walks the
//! [`EscalationPhase`] machine until the probe is answered or the terminator
//! has been invoked. A pending stop is honoured only at the end of a cycle,
//! and only if it is still pending after the confirmation delay.

use std::sync::Arc;
use std::time::Duration;

use crate::cancel::{CancellationToken, Cancelled};
use crate::probe::Probe;
use crate::state::{EscalationPhase, SupervisorState};
use crate::supervisor::Shared;
use crate::target::UnresponsiveReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleOutcome {
    Responsive,
    FalsePositive,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checkpoint {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    StopConfirmed,
    Terminated,
    Interrupted,
}

pub(crate) struct WatchdogWorker {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    run_id: u64,
}

impl WatchdogWorker {
    pub(crate) fn new(shared: Arc<Shared>, cancel: CancellationToken, run_id: u64) -> Self {
        Self {
            shared,
            cancel,
            run_id,
        }
    }

    pub(crate) fn run(self) {
        tracing::info!(
            target_context = self.shared.target.name(),
            run = self.run_id,
            "Supervision loop started"
        );

        let exit = self.supervise().unwrap_or(LoopExit::Interrupted);
        match exit {
            LoopExit::StopConfirmed => {
                tracing::info!(run = self.run_id, "Supervision stopped");
            }
            LoopExit::Terminated => {
                tracing::error!(
                    run = self.run_id,
                    "Terminator returned, supervision abandoned"
                );
                self.mark_stopped();
            }
            LoopExit::Interrupted => {
                self.shared.stats.inc_interruptions();
                tracing::info!(run = self.run_id, "Interruption caught, supervision stopped");
                self.mark_stopped();
            }
        }
    }

    fn supervise(&self) -> Result<LoopExit, Cancelled> {
        loop {
            self.cancel.sleep(self.shared.config.check_interval)?;

            if self.run_cycle()? == CycleOutcome::Terminated {
                return Ok(LoopExit::Terminated);
            }

            if self.checkpoint()? == Checkpoint::Stop {
                return Ok(LoopExit::StopConfirmed);
            }
        }
    }

    fn run_cycle(&self) -> Result<CycleOutcome, Cancelled> {
        let config = &self.shared.config;
        let target = self.shared.target.name();
        let cycle = self.shared.stats.next_cycle();
        let probe = Arc::new(Probe::new());
        let mut phase = EscalationPhase::Idle;

        loop {
            tracing::trace!(cycle, phase = %phase, "Probe cycle step");
            phase = match phase {
                EscalationPhase::Idle => {
                    self.post_probe(&probe, cycle);
                    EscalationPhase::AwaitingProbe
                }
                EscalationPhase::AwaitingProbe => {
                    self.wait_for_probe(&probe, config.timeout_check)?;
                    if let Some(latency) = probe.response_latency() {
                        self.shared.stats.record_response(latency);
                        tracing::debug!(cycle, latency_ms = millis(latency), "Target responded");
                        return Ok(CycleOutcome::Responsive);
                    }
                    self.shared.stats.record_unresponsive();
                    tracing::warn!(
                        target_context = target,
                        cycle,
                        timeout_ms = millis(config.timeout_check),
                        "Target context did not respond within timeout"
                    );
                    EscalationPhase::Escalating
                }
                EscalationPhase::Escalating => {
                    self.wait_for_probe(&probe, config.effective_grace())?;
                    if let Some(latency) = probe.response_latency() {
                        self.shared.stats.record_false_positive(latency);
                        tracing::info!(
                            target_context = target,
                            cycle,
                            latency_ms = millis(latency),
                            "Target responded within grace window, treating as false positive"
                        );
                        return Ok(CycleOutcome::FalsePositive);
                    }
                    EscalationPhase::Fatal
                }
                EscalationPhase::Fatal => {
                    let report = UnresponsiveReport {
                        target: target.to_owned(),
                        cycle,
                        waited: probe.age(),
                    };
                    tracing::error!(
                        target_context = target,
                        cycle,
                        waited_ms = millis(report.waited),
                        "Target context unresponsive after grace window"
                    );
                    self.shared.stats.inc_terminations();
                    self.shared.terminator.terminate_process_now(&report);
                    return Ok(CycleOutcome::Terminated);
                }
            };
        }
    }

    fn post_probe(&self, probe: &Arc<Probe>, cycle: u64) {
        match self.shared.target.post(probe.work_item()) {
            Ok(()) => self.shared.stats.record_post(true),
            Err(err) => {
                // Left unanswered: the cycle escalates exactly as for a timeout.
                self.shared.stats.record_post(false);
                tracing::warn!(
                    target_context = self.shared.target.name(),
                    cycle,
                    error = %err,
                    "Failed to post probe"
                );
            }
        }
    }

    /// Wait up to `bound` for `probe`, in slices of the grace poll interval so
    /// cancellation is seen between slices.
    fn wait_for_probe(&self, probe: &Probe, bound: Duration) -> Result<(), Cancelled> {
        let slice = self.shared.config.grace_poll_interval;
        let mut waited = Duration::ZERO;
        while waited < bound && !probe.is_called() {
            let step = slice.min(bound.saturating_sub(waited));
            if step.is_zero() {
                break;
            }
            probe.wait_for_signal(step);
            self.cancel.checkpoint()?;
            waited = waited.saturating_add(step);
        }
        Ok(())
    }

    fn checkpoint(&self) -> Result<Checkpoint, Cancelled> {
        if self.shared.control.lock().state != SupervisorState::StopRequested {
            return Ok(Checkpoint::Continue);
        }

        tracing::debug!(run = self.run_id, "Stop requested, confirming");
        self.cancel.sleep(self.shared.config.stop_confirm_delay)?;

        let mut control = self.shared.control.lock();
        if control.run_id == self.run_id && control.state == SupervisorState::StopRequested {
            control.state = SupervisorState::Stopped;
            return Ok(Checkpoint::Stop);
        }
        tracing::debug!(run = self.run_id, "Pending stop was cleared, continuing");
        Ok(Checkpoint::Continue)
    }

    fn mark_stopped(&self) {
        let mut control = self.shared.control.lock();
        if control.run_id == self.run_id {
            control.state = SupervisorState::Stopped;
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
