//! Output formatting for CLI responses

use anr_supervisor::{StatsSnapshot, SupervisorConfig, SupervisorState};
use anyhow::Error;
use colored::Colorize;
use serde_json::json;
use std::time::Duration;

use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    print_json(&error_json);
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(CliError::ValidationError(_)) => "validation",
        Some(CliError::IoError(_)) => "io",
        Some(CliError::JsonError(_)) => "json",
        Some(CliError::Supervisor(_)) => "supervisor",
        None => "unknown",
    }
}

/// Print a configuration in the requested format
pub fn print_config(config: &SupervisorConfig, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "config": config,
        }));
        return;
    }

    println!("{}", "Supervisor configuration:".bold());
    print_duration("Probe timeout", config.timeout_check);
    print_duration("Check interval", config.check_interval);
    print_duration("False positive grace", config.false_positive_grace);
    print_duration("Max escalation wait", config.max_escalation_wait);
    print_duration("Grace poll interval", config.grace_poll_interval);
    print_duration("Stop confirm delay", config.stop_confirm_delay);
    print_duration("Detection bound", config.detection_bound());
}

/// Print the outcome of a supervised run
pub fn print_run_summary(
    config: &SupervisorConfig,
    state: SupervisorState,
    stats: &StatsSnapshot,
    json: bool,
) {
    if json {
        print_json(&json!({
            "success": true,
            "state": state,
            "config": config,
            "stats": stats,
        }));
        return;
    }

    println!("{} {}", "Supervisor state:".bold(), state.to_string().cyan());
    println!("  Cycles:          {}", stats.cycles);
    println!("  Probes posted:   {}", stats.probes_posted);
    println!("  Responsive:      {}", stats.responsive.to_string().green());
    let unresponsive = stats.unresponsive.to_string();
    if stats.unresponsive == 0 {
        println!("  Unresponsive:    {}", unresponsive.green());
    } else {
        println!("  Unresponsive:    {}", unresponsive.yellow());
    }
    println!("  False positives: {}", stats.false_positives);
    println!("  Stop requests:   {}", stats.stop_requests);
    println!("  Resumes:         {}", stats.resumes);
    println!("  Last latency:    {:?}", stats.last_latency());
}

fn print_duration(label: &str, value: Duration) {
    println!("  {:<22} {}", format!("{label}:"), format!("{}ms", value.as_millis()).cyan());
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}
