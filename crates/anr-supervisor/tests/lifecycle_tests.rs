//! Tests for supervisor start/stop/resume lifecycle scenarios.

mod common;

use anr_supervisor::prelude::*;
use common::{RecordingTerminator, Response, ScriptedTarget, TestResult, config, wait_until};
use std::thread;
use std::time::Duration;

fn prompt_target() -> ScriptedTarget {
    ScriptedTarget::new(Response::After(Duration::from_millis(2)))
}

#[test]
fn test_start_is_idempotent() -> TestResult {
    let terminator = RecordingTerminator::default();
    let supervisor = Supervisor::new(config(200, 20, 100)?, prompt_target(), terminator.clone())?;

    supervisor.start()?;
    supervisor.start()?;
    assert_eq!(supervisor.state(), SupervisorState::Running);
    assert_eq!(supervisor.stats().runs_started, 1);

    thread::sleep(Duration::from_millis(100));
    supervisor.start()?;
    assert_eq!(supervisor.stats().runs_started, 1);

    supervisor.interrupt();
    assert_eq!(terminator.count(), 0);
    Ok(())
}

#[test]
fn test_deferred_stop_completes() -> TestResult {
    let target = prompt_target();
    let supervisor = Supervisor::new(config(200, 20, 100)?, target.clone(), RecordingTerminator::default())?;

    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(2), || target.posted() >= 2));

    supervisor.stop();
    assert_eq!(supervisor.state(), SupervisorState::StopRequested);
    assert!(!supervisor.is_stopped());

    assert!(wait_until(Duration::from_secs(2), || supervisor.is_stopped()));
    let stats = supervisor.stats();
    assert_eq!(stats.stop_requests, 1);
    assert_eq!(stats.interruptions, 0);
    Ok(())
}

#[test]
fn test_stop_then_start_is_a_resume() -> TestResult {
    let cfg = SupervisorConfig::builder()
        .timeout_check(Duration::from_millis(200))
        .check_interval(Duration::from_millis(20))
        .false_positive_grace(Duration::from_millis(100))
        .grace_poll_interval(Duration::from_millis(10))
        .stop_confirm_delay(Duration::from_millis(300))
        .build()?;
    let supervisor = Supervisor::new(cfg, prompt_target(), RecordingTerminator::default())?;

    supervisor.start()?;
    supervisor.stop();
    supervisor.start()?;
    assert_eq!(supervisor.state(), SupervisorState::Running);

    thread::sleep(Duration::from_millis(500));
    assert_eq!(supervisor.state(), SupervisorState::Running);

    let stats = supervisor.stats();
    assert_eq!(stats.runs_started, 1);
    assert_eq!(stats.resumes, 1);
    assert!(stats.cycles >= 2);
    supervisor.interrupt();
    Ok(())
}

#[test]
fn test_resume_during_confirmation_delay_cancels_stop() -> TestResult {
    let cfg = SupervisorConfig::builder()
        .timeout_check(Duration::from_millis(200))
        .check_interval(Duration::from_millis(20))
        .false_positive_grace(Duration::from_millis(100))
        .grace_poll_interval(Duration::from_millis(10))
        .stop_confirm_delay(Duration::from_millis(400))
        .build()?;
    let target = prompt_target();
    let supervisor = Supervisor::new(cfg, target.clone(), RecordingTerminator::default())?;

    supervisor.start()?;
    supervisor.stop();

    // The first cycle ends well inside the confirmation delay.
    let posted_before = target.posted();
    assert!(wait_until(Duration::from_secs(1), || supervisor.stats().responsive >= 1));
    thread::sleep(Duration::from_millis(50));
    supervisor.start()?;

    assert!(wait_until(Duration::from_secs(2), || target.posted() > posted_before + 2));
    assert_eq!(supervisor.state(), SupervisorState::Running);
    assert_eq!(supervisor.stats().runs_started, 1);
    supervisor.interrupt();
    Ok(())
}

#[test]
fn test_in_flight_probe_completes_before_stop() -> TestResult {
    let target = ScriptedTarget::new(Response::After(Duration::from_millis(150)));
    let supervisor = Supervisor::new(config(500, 20, 100)?, target.clone(), RecordingTerminator::default())?;

    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(1), || target.posted() >= 1));
    supervisor.stop();

    assert!(wait_until(Duration::from_secs(3), || supervisor.is_stopped()));
    let stats = supervisor.stats();
    assert!(stats.cycles >= 1);
    assert_eq!(stats.cycles, stats.responsive);
    assert!(stats.last_latency() >= Duration::from_millis(150));
    Ok(())
}

#[test]
fn test_restart_after_full_stop_spawns_new_worker() -> TestResult {
    let supervisor = Supervisor::new(config(200, 20, 100)?, prompt_target(), RecordingTerminator::default())?;

    supervisor.start()?;
    supervisor.stop();
    assert!(wait_until(Duration::from_secs(2), || supervisor.is_stopped()));

    supervisor.start()?;
    assert_eq!(supervisor.state(), SupervisorState::Running);
    assert_eq!(supervisor.stats().runs_started, 2);

    let cycles = supervisor.stats().cycles;
    assert!(wait_until(Duration::from_secs(2), || supervisor.stats().cycles > cycles));
    supervisor.interrupt();
    Ok(())
}

#[test]
fn test_interrupt_wins_over_long_interval() -> TestResult {
    let supervisor = Supervisor::new(config(200, 60_000, 100)?, prompt_target(), RecordingTerminator::default())?;
    supervisor.start()?;

    let start = std::time::Instant::now();
    supervisor.interrupt();
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(supervisor.is_stopped());
    assert_eq!(supervisor.stats().cycles, 0);
    Ok(())
}

#[test]
fn test_drop_stops_worker() -> TestResult {
    let target = prompt_target();
    let supervisor = Supervisor::new(config(200, 20, 100)?, target.clone(), RecordingTerminator::default())?;
    supervisor.start()?;
    assert!(wait_until(Duration::from_secs(1), || target.posted() >= 1));
    drop(supervisor);

    let posted = target.posted();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(target.posted(), posted);
    Ok(())
}
