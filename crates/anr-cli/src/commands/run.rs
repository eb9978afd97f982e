//! Drive a simulated main loop under supervision

use anr_supervisor::{MainThreadDispatcher, Supervisor, SupervisorConfig};
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::commands::RunArgs;
use crate::commands::config::load_config;
use crate::error::CliError;
use crate::output;

/// Build the effective configuration: file first, then flag overrides.
pub fn build_config(args: &RunArgs) -> Result<SupervisorConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SupervisorConfig::default(),
    };

    if let Some(ms) = args.timeout_ms {
        config.timeout_check = Duration::from_millis(ms);
    }
    if let Some(ms) = args.interval_ms {
        config.check_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = args.grace_ms {
        config.false_positive_grace = Duration::from_millis(ms);
    }
    if let Some(ms) = args.max_escalation_ms {
        config.max_escalation_wait = Duration::from_millis(ms);
    }
    // A short grace window would otherwise trip the poll <= grace rule.
    if config.grace_poll_interval > config.false_positive_grace {
        warn!(
            grace_poll_interval_ms = config.grace_poll_interval.as_millis(),
            false_positive_grace_ms = config.false_positive_grace.as_millis(),
            "Grace poll interval exceeds the grace window, lowering it to match"
        );
        config.grace_poll_interval = config.false_positive_grace;
    }

    config.validate()?;
    Ok(config)
}

/// Execute the run command
pub fn execute(args: &RunArgs, json: bool) -> Result<()> {
    if args.frame_ms == 0 {
        return Err(CliError::ValidationError("--frame-ms must be non-zero".to_string()).into());
    }

    let config = build_config(args)?;
    let dispatcher = MainThreadDispatcher::new("main");
    let supervisor = Supervisor::with_target(config, dispatcher.handle()).map_err(CliError::from)?;
    supervisor.start().map_err(CliError::from)?;

    info!(
        duration_ms = args.duration_ms,
        hang_after_ms = ?args.hang_after_ms,
        stop_after_ms = ?args.stop_after_ms,
        "Main loop started"
    );

    let duration = Duration::from_millis(args.duration_ms);
    let frame = Duration::from_millis(args.frame_ms);
    let hang_after = args.hang_after_ms.map(Duration::from_millis);
    let mut stop_after = args.stop_after_ms.map(Duration::from_millis);
    let started = Instant::now();

    loop {
        let elapsed = started.elapsed();
        if elapsed >= duration {
            break;
        }

        if let Some(at) = stop_after
            && elapsed >= at
        {
            info!("Requesting deferred stop");
            supervisor.stop();
            stop_after = None;
        }

        if let Some(at) = hang_after
            && elapsed >= at
        {
            warn!("Main loop no longer draining work");
            std::thread::sleep(duration.saturating_sub(elapsed));
            break;
        }

        dispatcher.run_for(frame.min(duration.saturating_sub(elapsed)));
    }

    supervisor.interrupt();
    let stats = supervisor.stats();
    info!(cycles = stats.cycles, responsive = stats.responsive, "Main loop finished");
    output::print_run_summary(supervisor.config(), supervisor.state(), &stats, json);
    Ok(())
}
