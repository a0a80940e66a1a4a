//! One-shot mode: run the report tool once and turn the result into an exit code.

use std::process::ExitCode;
use std::time::Duration;

use crate::edac::{ExecutionError, ReportSource};
use crate::monitor::{execution_error_message, total_message, NO_ERRORS_MESSAGE};
use crate::report::aggregate_report;
use crate::sink::{LogSink, Severity};

/// Exit code when no errors were reported.
pub const EXIT_CLEAN: u8 = 0;
/// Exit code when the report tool could not be run.
pub const EXIT_EXECUTION_FAILED: u8 = 1;
/// Exit code when errors were reported.
pub const EXIT_ERRORS_FOUND: u8 = 2;

/// Result of a single report run.
#[derive(Debug)]
pub enum OneShotOutcome {
    /// All counters were zero.
    Clean,
    /// At least one counter was non-zero; carries the total.
    ErrorsFound(i64),
    /// The report tool could not be run.
    Failed(ExecutionError),
}

impl OneShotOutcome {
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::Clean => EXIT_CLEAN,
            Self::Failed(_) => EXIT_EXECUTION_FAILED,
            Self::ErrorsFound(_) => EXIT_ERRORS_FOUND,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Run one report and log its findings to `sink`.
///
/// `binary` names the tool in the failure message. A "no errors" line is
/// logged only when `log_zero` is non-zero.
pub async fn run_once<R>(
    source: &R,
    binary: &str,
    sink: &dyn LogSink,
    log_zero: Duration,
) -> OneShotOutcome
where
    R: ReportSource + ?Sized,
{
    let report = match source.fetch().await {
        Ok(report) => report,
        Err(e) => {
            tracing::debug!(error = ?e, "Report tool failed");
            sink.log(Severity::Error, &execution_error_message(binary, &e));
            return OneShotOutcome::Failed(e);
        }
    };

    let result = aggregate_report(&report, sink, Severity::Alert);
    if result.has_errors() {
        sink.log(Severity::Error, &total_message(result.total));
        return OneShotOutcome::ErrorsFound(result.total);
    }

    if !log_zero.is_zero() {
        sink.log(Severity::Info, NO_ERRORS_MESSAGE);
    }
    OneShotOutcome::Clean
}
