//! Supervisor configuration.
//!
//! Configuration is fixed once a [`Supervisor`](crate::Supervisor) is built.
//! Durations are serialized as integer milliseconds so configuration files
//! stay readable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{SupervisorError, SupervisorResult};

/// Default wait bound for a single probe.
pub const DEFAULT_TIMEOUT_CHECK: Duration = Duration::from_secs(2);
/// Default sleep between two probes.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(5);
/// Default extra wait after a timeout before escalating.
pub const DEFAULT_FALSE_POSITIVE_GRACE: Duration = Duration::from_secs(1);
/// Default hard cap on the grace window.
pub const DEFAULT_MAX_ESCALATION_WAIT: Duration = Duration::from_secs(5);
/// Default sub-interval used while polling inside the grace window.
pub const DEFAULT_GRACE_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Default delay used to confirm a pending stop request.
pub const DEFAULT_STOP_CONFIRM_DELAY: Duration = Duration::from_secs(1);

/// Supervisor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// How long to wait for a posted probe to run.
    #[serde(rename = "timeout_check_ms", with = "duration_ms")]
    pub timeout_check: Duration,
    /// Sleep between the end of one cycle and the next probe.
    #[serde(rename = "check_interval_ms", with = "duration_ms")]
    pub check_interval: Duration,
    /// Additional wait after a timeout before the target is declared dead.
    #[serde(rename = "false_positive_grace_ms", with = "duration_ms")]
    pub false_positive_grace: Duration,
    /// Upper clamp on the grace window.
    #[serde(rename = "max_escalation_wait_ms", with = "duration_ms")]
    pub max_escalation_wait: Duration,
    /// Polling granularity inside the grace window.
    #[serde(rename = "grace_poll_interval_ms", with = "duration_ms")]
    pub grace_poll_interval: Duration,
    /// Delay between observing a stop request and honouring it.
    #[serde(rename = "stop_confirm_delay_ms", with = "duration_ms")]
    pub stop_confirm_delay: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            timeout_check: DEFAULT_TIMEOUT_CHECK,
            check_interval: DEFAULT_CHECK_INTERVAL,
            false_positive_grace: DEFAULT_FALSE_POSITIVE_GRACE,
            max_escalation_wait: DEFAULT_MAX_ESCALATION_WAIT,
            grace_poll_interval: DEFAULT_GRACE_POLL_INTERVAL,
            stop_confirm_delay: DEFAULT_STOP_CONFIRM_DELAY,
        }
    }
}

impl SupervisorConfig {
    /// Create a configuration from a probe timeout and a check interval in
    /// whole seconds, keeping every other value at its default.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is zero.
    pub fn from_secs(timeout_check_secs: u64, check_interval_secs: u64) -> SupervisorResult<Self> {
        Self::builder()
            .timeout_check(Duration::from_secs(timeout_check_secs))
            .check_interval(Duration::from_secs(check_interval_secs))
            .build()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any duration is zero, if the grace window exceeds
    /// `max_escalation_wait`, or if the poll interval exceeds the grace window.
    pub fn validate(&self) -> SupervisorResult<()> {
        let non_zero = [
            ("timeout_check", self.timeout_check),
            ("check_interval", self.check_interval),
            ("false_positive_grace", self.false_positive_grace),
            ("max_escalation_wait", self.max_escalation_wait),
            ("grace_poll_interval", self.grace_poll_interval),
            ("stop_confirm_delay", self.stop_confirm_delay),
        ];
        for (name, value) in non_zero {
            if value.is_zero() {
                return Err(SupervisorError::invalid_configuration(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        if self.false_positive_grace > self.max_escalation_wait {
            return Err(SupervisorError::invalid_configuration(format!(
                "false_positive_grace ({:?}) must not exceed max_escalation_wait ({:?})",
                self.false_positive_grace, self.max_escalation_wait
            )));
        }
        if self.grace_poll_interval > self.false_positive_grace {
            return Err(SupervisorError::invalid_configuration(
                "grace_poll_interval must not exceed false_positive_grace",
            ));
        }
        Ok(())
    }

    /// Grace window actually applied after a probe timeout.
    #[must_use]
    pub fn effective_grace(&self) -> Duration {
        self.false_positive_grace.min(self.max_escalation_wait)
    }

    /// Longest time a single probe can stay unanswered before the terminator runs.
    #[must_use]
    pub fn detection_bound(&self) -> Duration {
        self.timeout_check.saturating_add(self.effective_grace())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> SupervisorConfigBuilder {
        SupervisorConfigBuilder::default()
    }
}

/// Builder for `SupervisorConfig`.
#[derive(Debug, Default)]
pub struct SupervisorConfigBuilder {
    config: SupervisorConfig,
}

impl SupervisorConfigBuilder {
    /// Set the probe timeout.
    #[must_use]
    pub fn timeout_check(mut self, timeout: Duration) -> Self {
        self.config.timeout_check = timeout;
        self
    }

    /// Set the interval between probes.
    #[must_use]
    pub fn check_interval(mut self, interval: Duration) -> Self {
        self.config.check_interval = interval;
        self
    }

    /// Set the false positive grace window.
    #[must_use]
    pub fn false_positive_grace(mut self, grace: Duration) -> Self {
        self.config.false_positive_grace = grace;
        self
    }

    /// Set the upper clamp on the grace window.
    #[must_use]
    pub fn max_escalation_wait(mut self, max: Duration) -> Self {
        self.config.max_escalation_wait = max;
        self
    }

    /// Set the grace window polling granularity.
    #[must_use]
    pub fn grace_poll_interval(mut self, interval: Duration) -> Self {
        self.config.grace_poll_interval = interval;
        self
    }

    /// Set the stop confirmation delay.
    #[must_use]
    pub fn stop_confirm_delay(mut self, delay: Duration) -> Self {
        self.config.stop_confirm_delay = delay;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> SupervisorResult<SupervisorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
