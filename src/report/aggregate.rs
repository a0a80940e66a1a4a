//! Report aggregation: parse every line, log what was found, sum the counts.

use crate::report::{parse_line, ParsedRecord};
use crate::sink::{LogSink, Severity};

/// Outcome of processing one full report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportResult {
    /// Sum of all non-zero counts.
    pub total: i64,
    /// Records with a non-zero count, in report order.
    pub records: Vec<ParsedRecord>,
    /// Lines that failed to parse.
    pub skipped: usize,
}

impl ReportResult {
    /// Whether any non-zero counter was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.total != 0
    }
}

/// Process every line of `report`, logging alerts and diagnostics to `sink`.
///
/// Lines are handled independently: a malformed or garbled line is logged
/// and skipped without affecting the rest. Records with a zero count are
/// neither logged nor counted.
pub fn aggregate_report(report: &str, sink: &dyn LogSink, severity: Severity) -> ReportResult {
    let mut result = ReportResult::default();

    for line in report.split('\n') {
        match parse_line(line) {
            Ok(None) => {}
            Ok(Some(record)) if record.count == 0 => {
                tracing::trace!(line, "Zero count, suppressed");
            }
            Ok(Some(record)) => {
                sink.log(severity, &record.alert_message());
                result.total = result.total.saturating_add(record.count);
                result.records.push(record);
            }
            Err(e) => {
                tracing::debug!(error = ?e, "Skipping unparsable report line");
                sink.log(severity, &e.to_string());
                result.skipped += 1;
            }
        }
    }

    tracing::debug!(
        total = result.total,
        alerts = result.records.len(),
        skipped = result.skipped,
        "Report processed"
    );
    result
}
