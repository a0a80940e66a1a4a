//! `edac-util` process invocation.
//!
//! This module provides a builder for the command line and a
//! [`ReportSource`] implementation that runs it once and captures stdout.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

/// Default binary name.
pub const DEFAULT_EDAC_UTIL: &str = "edac-util";

/// Argument requesting the full per-row report.
pub const FULL_REPORT_ARG: &str = "--report=full";

/// Error type for a single report invocation.
#[derive(thiserror::Error, Debug)]
pub enum ExecutionError {
    /// The binary was not found.
    #[error("{binary} not found")]
    NotFound { binary: String },
    /// Permission denied when spawning.
    #[error("Permission denied running {binary}")]
    PermissionDenied { binary: String },
    /// The tool ran but exited unsuccessfully.
    #[error("{binary} exited with {status}{}", stderr_suffix(.stderr))]
    Failed {
        binary: String,
        status: ExitStatus,
        stderr: Option<String>,
    },
    /// The tool did not finish within the configured timeout.
    #[error("{binary} did not finish within {after:?}")]
    Timeout { binary: String, after: Duration },
    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &Option<String>) -> String {
    stderr
        .as_deref()
        .map_or_else(String::new, |line| format!(": {line}"))
}

impl ExecutionError {
    /// Create an `ExecutionError` from a spawn failure, classifying common cases.
    fn from_spawn(binary: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                binary: binary.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                binary: binary.to_string(),
            },
            _ => Self::Io(err),
        }
    }
}

/// Anything that can produce the raw text of one report.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Produce one full report.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` if the report could not be obtained.
    async fn fetch(&self) -> Result<String, ExecutionError>;
}

/// Builder and runner for `edac-util` invocations.
#[derive(Debug, Clone)]
pub struct EdacUtil {
    binary: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Default for EdacUtil {
    fn default() -> Self {
        Self::new(DEFAULT_EDAC_UTIL)
    }
}

impl EdacUtil {
    /// Create a runner for the given binary with the full-report argument.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            args: vec![FULL_REPORT_ARG.to_string()],
            timeout: None,
        }
    }

    /// Replace the arguments passed to the binary.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kill the tool if it runs longer than `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the tool once and return its stdout.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` if the binary cannot be spawned, exits
    /// unsuccessfully, or exceeds the timeout.
    pub async fn run(&self) -> Result<String, ExecutionError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(binary = %self.binary, args = ?self.args, "Running report tool");
        let child = cmd
            .spawn()
            .map_err(|e| ExecutionError::from_spawn(&self.binary, e))?;

        let output = match self.timeout {
            Some(after) => tokio::time::timeout(after, child.wait_with_output())
                .await
                .map_err(|_| ExecutionError::Timeout {
                    binary: self.binary.clone(),
                    after,
                })??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(String::from);
            return Err(ExecutionError::Failed {
                binary: self.binary.clone(),
                status: output.status,
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(
            binary = %self.binary,
            bytes = output.stdout.len(),
            "Report tool finished"
        );
        Ok(stdout)
    }
}

#[async_trait]
impl ReportSource for EdacUtil {
    async fn fetch(&self) -> Result<String, ExecutionError> {
        self.run().await
    }
}
