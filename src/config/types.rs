//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{format_duration, serde_duration, ConfigError};
use crate::edac::{EdacUtil, DEFAULT_EDAC_UTIL, FULL_REPORT_ARG};

/// Where poll-mode report messages are written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Local syslog socket, `kern` facility.
    #[default]
    Syslog,
    /// Plain lines on stderr.
    Stderr,
    /// The tracing subscriber.
    Tracing,
}

/// Configuration for the monitor, loaded from TOML and overridden by flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Poll repeatedly instead of running once.
    pub poll: bool,
    /// Time between polls.
    #[serde(with = "serde_duration")]
    pub delay: Duration,
    /// Minimum time between "no errors" log entries. Zero disables them.
    #[serde(with = "serde_duration")]
    pub log_zero: Duration,
    /// Name or path of the report tool.
    pub edac_util: String,
    /// Arguments passed to the report tool.
    pub report_args: Vec<String>,
    /// Kill the report tool after this long.
    #[serde(with = "serde_duration::option", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// Poll-mode message destination.
    pub sink: SinkKind,
    /// Syslog tag.
    pub tag: String,
}

/// Default time between polls.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(10);

/// Default syslog tag.
pub const DEFAULT_TAG: &str = "edac-monitor";

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll: false,
            delay: DEFAULT_DELAY,
            log_zero: Duration::ZERO,
            edac_util: DEFAULT_EDAC_UTIL.to_string(),
            report_args: vec![FULL_REPORT_ARG.to_string()],
            timeout: None,
            sink: SinkKind::default(),
            tag: DEFAULT_TAG.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Check values that parse fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edac_util.trim().is_empty() {
            return Err(ConfigError::Invalid("edac_util must not be empty".to_string()));
        }
        if self.poll && self.delay.is_zero() {
            return Err(ConfigError::Invalid(
                "delay must be greater than zero when polling".to_string(),
            ));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether healthy reports are ever logged.
    #[must_use]
    pub fn logs_zero(&self) -> bool {
        !self.log_zero.is_zero()
    }

    /// Build the report tool runner described by this config.
    #[must_use]
    pub fn runner(&self) -> EdacUtil {
        let runner = EdacUtil::new(&self.edac_util).args(self.report_args.iter().cloned());
        match self.timeout {
            Some(t) => runner.timeout(t),
            None => runner,
        }
    }
}

/// Startup line for a given delay and zero-log interval.
#[must_use]
pub fn startup_message(delay: Duration, log_zero: Duration) -> String {
    if log_zero.is_zero() {
        format!(
            "Polling EDAC every {}, logging only when errors occur.",
            format_duration(delay)
        )
    } else {
        format!(
            "Polling EDAC every {}, logging every {} even if no errors reported.",
            format_duration(delay),
            format_duration(log_zero)
        )
    }
}
