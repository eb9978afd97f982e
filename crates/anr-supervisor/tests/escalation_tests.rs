//! Tests for timeout detection, the grace window and termination.

mod common;

use anr_supervisor::prelude::*;
use common::{RecordingTerminator, Response, ScriptedTarget, TestResult, config, wait_until};
use std::thread;
use std::time::Duration;

#[test]
fn test_responsive_target_is_never_escalated() -> TestResult {
    let target = ScriptedTarget::new(Response::After(Duration::from_millis(10)));
    let terminator = RecordingTerminator::default();
    let supervisor = Supervisor::new(config(200, 50, 100)?, target.clone(), terminator.clone())?;

    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(3), || supervisor.stats().responsive >= 5));
    supervisor.interrupt();

    let stats = supervisor.stats();
    assert_eq!(stats.unresponsive, 0);
    assert_eq!(stats.false_positives, 0);
    assert_eq!(stats.terminations, 0);
    assert_eq!(terminator.count(), 0);
    assert_eq!(target.overlaps(), 0);
    Ok(())
}

#[test]
fn test_grace_window_suppresses_false_positive() -> TestResult {
    // Probe timeout 400ms, grace 200ms, answer at 500ms.
    let target = ScriptedTarget::new(Response::After(Duration::from_millis(500)));
    let terminator = RecordingTerminator::default();
    let supervisor = Supervisor::new(config(400, 20, 200)?, target, terminator.clone())?;

    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(3), || supervisor.stats().false_positives >= 1));
    supervisor.interrupt();

    let stats = supervisor.stats();
    assert!(stats.unresponsive >= 1);
    assert_eq!(stats.terminations, 0);
    assert_eq!(terminator.count(), 0);
    assert!(stats.last_latency() >= Duration::from_millis(500));
    Ok(())
}

#[test]
fn test_confirmed_timeout_terminates_once() -> TestResult {
    let target = ScriptedTarget::new(Response::Never);
    let terminator = RecordingTerminator::default();
    let cfg = config(200, 20, 100)?;
    let supervisor = Supervisor::new(cfg, target.clone(), terminator.clone())?;

    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(3), || terminator.count() >= 1));
    // A terminator that returns ends supervision.
    assert!(wait_until(Duration::from_secs(1), || supervisor.is_stopped()));
    thread::sleep(Duration::from_millis(100));

    assert_eq!(terminator.count(), 1);
    assert_eq!(target.posted(), 1);

    let (terminated_at, report) = terminator.first().ok_or("expected a termination")?;
    let posted_at = target.last_post().ok_or("expected a posted probe")?;
    let elapsed = terminated_at.duration_since(posted_at);
    assert!(elapsed >= cfg.detection_bound(), "terminated after {elapsed:?}");
    assert!(elapsed < cfg.timeout_check + cfg.max_escalation_wait);

    assert_eq!(report.target, "scripted");
    assert_eq!(report.cycle, 1);
    assert!(report.waited >= Duration::from_millis(300));

    let stats = supervisor.stats();
    assert_eq!(stats.unresponsive, 1);
    assert_eq!(stats.terminations, 1);
    Ok(())
}

#[test]
fn test_refused_probe_is_treated_as_timeout() -> TestResult {
    let target = ScriptedTarget::new(Response::Refuse);
    let terminator = RecordingTerminator::default();
    let supervisor = Supervisor::new(config(100, 20, 50)?, target, terminator.clone())?;

    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(3), || terminator.count() >= 1));

    let stats = supervisor.stats();
    assert_eq!(stats.post_failures, 1);
    assert_eq!(stats.probes_posted, 0);
    assert_eq!(stats.unresponsive, 1);
    Ok(())
}

#[test]
fn test_interrupt_during_grace_window_never_terminates() -> TestResult {
    let target = ScriptedTarget::new(Response::Never);
    let terminator = RecordingTerminator::default();
    let cfg = SupervisorConfig::builder()
        .timeout_check(Duration::from_millis(100))
        .check_interval(Duration::from_millis(20))
        .false_positive_grace(Duration::from_secs(3))
        .max_escalation_wait(Duration::from_secs(5))
        .grace_poll_interval(Duration::from_millis(10))
        .build()?;
    let supervisor = Supervisor::new(cfg, target, terminator.clone())?;

    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(2), || supervisor.stats().unresponsive >= 1));
    supervisor.interrupt();

    assert!(supervisor.is_stopped());
    assert_eq!(terminator.count(), 0);
    let stats = supervisor.stats();
    assert_eq!(stats.terminations, 0);
    assert_eq!(stats.interruptions, 1);
    Ok(())
}

#[test]
fn test_dispatcher_hang_is_detected() -> TestResult {
    let dispatcher = MainThreadDispatcher::new("ui");
    let terminator = RecordingTerminator::default();
    let supervisor = Supervisor::new(config(100, 20, 50)?, dispatcher.handle(), terminator.clone())?;
    assert_eq!(supervisor.target_name(), "ui");

    supervisor.start()?;
    for _ in 0..10 {
        dispatcher.run_for(Duration::from_millis(20));
    }
    assert!(supervisor.stats().responsive >= 1);
    assert_eq!(terminator.count(), 0);

    // Stop draining: the main loop is now hung.
    assert!(wait_until(Duration::from_secs(3), || terminator.count() >= 1));
    let (_, report) = terminator.first().ok_or("expected a termination")?;
    assert_eq!(report.target, "ui");
    Ok(())
}
