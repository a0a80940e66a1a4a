//! Poll loop: fetch a report on a fixed cadence and alert on non-zero counters.
//!
//! Each iteration runs the report tool once, logs every non-zero counter at
//! [`Severity::Alert`] as it is parsed, then logs either a total at
//! [`Severity::Error`] or, subject to the [`ZeroLogThrottle`], a "no errors"
//! line at [`Severity::Info`]. A failed invocation is logged and the loop
//! waits for the next poll; nothing short of cancellation ends it.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::{startup_message, DEFAULT_DELAY};
use crate::edac::ReportSource;
use crate::monitor::{execution_error_message, total_message, ZeroLogThrottle, NO_ERRORS_MESSAGE};
use crate::report::aggregate_report;
use crate::sink::{LogSink, Severity};

/// Message logged when the loop is cancelled.
pub const STOPPED_MESSAGE: &str = "EDAC polling stopped.";

/// Cadence settings for [`PollLoop`].
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Time to sleep after each iteration.
    pub delay: Duration,
    /// Minimum time between "no errors" lines; zero disables them.
    pub log_zero: Duration,
    /// Name of the report tool, used in failure messages.
    pub binary: String,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            log_zero: Duration::ZERO,
            binary: crate::edac::DEFAULT_EDAC_UTIL.to_string(),
        }
    }
}

/// What a single poll iteration observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The report tool could not be run.
    Failed,
    /// Non-zero counters were reported; carries the total.
    ErrorsFound(i64),
    /// All counters were zero. `logged` says whether the status line was emitted.
    Healthy { logged: bool },
}

/// Counters kept across iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub iterations: u64,
    pub failures: u64,
    pub reports_with_errors: u64,
}

/// Sequential polling driver.
pub struct PollLoop<R, S> {
    source: R,
    sink: S,
    settings: PollSettings,
    throttle: ZeroLogThrottle,
    stats: PollStats,
}

impl<R, S> PollLoop<R, S>
where
    R: ReportSource,
    S: LogSink,
{
    #[must_use]
    pub fn new(source: R, sink: S, settings: PollSettings) -> Self {
        let throttle = ZeroLogThrottle::new(settings.log_zero);
        Self {
            source,
            sink,
            settings,
            throttle,
            stats: PollStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Log the startup line describing the cadence.
    pub fn announce(&self) {
        self.sink.log(
            Severity::Info,
            &startup_message(self.settings.delay, self.settings.log_zero),
        );
    }

    /// Run one iteration without sleeping.
    pub async fn poll_once(&mut self) -> PollOutcome {
        self.stats.iterations += 1;

        let report = match self.source.fetch().await {
            Ok(report) => report,
            Err(e) => {
                self.stats.failures += 1;
                tracing::debug!(error = ?e, "Report tool failed, waiting for next poll");
                self.sink.log(
                    Severity::Error,
                    &execution_error_message(&self.settings.binary, &e),
                );
                return PollOutcome::Failed;
            }
        };

        let result = aggregate_report(&report, &self.sink, Severity::Alert);
        if result.has_errors() {
            self.stats.reports_with_errors += 1;
            self.sink.log(Severity::Error, &total_message(result.total));
            return PollOutcome::ErrorsFound(result.total);
        }

        let logged = self.throttle.try_acquire(Instant::now());
        if logged {
            self.sink.log(Severity::Info, NO_ERRORS_MESSAGE);
        }
        PollOutcome::Healthy { logged }
    }

    /// Poll until `cancel` fires.
    ///
    /// The token is checked between iterations and raced against the sleep;
    /// a report tool that is already running is allowed to finish.
    pub async fn run(&mut self, cancel: CancellationToken) {
        self.announce();

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let outcome = self.poll_once().await;
            tracing::debug!(?outcome, iteration = self.stats.iterations, "Poll finished");

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.settings.delay) => {}
            }
        }

        tracing::info!(
            iterations = self.stats.iterations,
            failures = self.stats.failures,
            "Poll loop cancelled"
        );
        self.sink.log(Severity::Info, STOPPED_MESSAGE);
    }
}
