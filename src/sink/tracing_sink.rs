//! Sink that forwards report lines to the tracing subscriber.

use super::{LogSink, Severity};

/// Target used for every forwarded report line.
pub const REPORT_TARGET: &str = "edac_monitor::report";

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Alert | Severity::Error => {
                tracing::error!(target: REPORT_TARGET, %severity, "{message}");
            }
            Severity::Info => tracing::info!(target: REPORT_TARGET, "{message}"),
        }
    }
}
