//! Report parsing and aggregation tests.

mod aggregate_test;

/// Verify the public report types are exported from the library.
#[test]
fn test_all_report_types_exported() {
    use edac_monitor::report::{
        aggregate_report, parse_count, parse_line, ErrorKind, LineError, ParsedRecord,
        ReportResult, FIELD_COUNT,
    };

    assert_eq!(FIELD_COUNT, 5);
    let _: fn(&str) -> Result<Option<ParsedRecord>, LineError> = parse_line;
    let _: fn(&str) -> Option<i64> = parse_count;
    let _ = ErrorKind::Unknown;
    let _ = ReportResult::default();
    let _ = aggregate_report;
}
