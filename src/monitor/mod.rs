//! One-shot and polling drivers.
//!
//! Both drivers fetch a report from a [`ReportSource`](crate::edac::ReportSource),
//! run it through [`aggregate_report`](crate::report::aggregate_report) and
//! decide what summary to log.

mod once;
mod poll;
mod shutdown;
mod throttle;

pub use once::*;
pub use poll::*;
pub use shutdown::*;
pub use throttle::*;

/// Summary line for a report with errors.
#[must_use]
pub fn total_message(total: i64) -> String {
    format!("EDAC reports a total of {total} errors.")
}

/// Status line for a healthy report.
pub const NO_ERRORS_MESSAGE: &str = "EDAC reports no errors.";

/// Log line for a failed invocation.
#[must_use]
pub fn execution_error_message(binary: &str, err: &crate::edac::ExecutionError) -> String {
    format!("Error running {binary}: {err}")
}
