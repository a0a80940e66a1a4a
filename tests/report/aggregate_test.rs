//! Aggregation over whole reports.

use edac_monitor::report::aggregate_report;
use edac_monitor::sink::{MemorySink, Severity};

#[test]
fn total_ignores_interleaved_bad_lines() {
    let good = [
        ("mc0:csrow0:DIMM_A:CE:{}", 5),
        ("mc0:csrow1:DIMM_B:UE:{}", 0),
        ("mc1:csrow0:DIMM_C:XX:{}", 7),
        ("mc1:csrow1:DIMM_D:CE:{}", 11),
    ];
    let bad = ["", "edac-util: No errors to report.", "a:b:c:CE:nope", "a:b"];

    let mut report = String::new();
    let mut expected = 0;
    let mut expected_alerts = 0;
    for (i, (template, count)) in good.iter().enumerate() {
        report.push_str(&template.replace("{}", &count.to_string()));
        report.push('\n');
        report.push_str(bad[i % bad.len()]);
        report.push('\n');
        expected += count;
        if *count != 0 {
            expected_alerts += 1;
        }
    }

    let sink = MemorySink::new();
    let result = aggregate_report(&report, &sink, Severity::Alert);

    assert_eq!(result.total, expected);
    assert_eq!(result.records.len(), expected_alerts);
    assert_eq!(result.skipped, 3);
    assert_eq!(sink.len(), expected_alerts + 3);
}

#[test]
fn diagnostics_quote_raw_line() {
    let sink = MemorySink::new();
    let result = aggregate_report("mc0:csrow0:DIMM_A:CE:lots\n", &sink, Severity::Alert);
    assert_eq!(result.total, 0);
    assert_eq!(
        sink.at(Severity::Alert),
        vec!["Garbled line in edac-util output: mc0:csrow0:DIMM_A:CE:lots".to_string()]
    );
}

#[test]
fn report_without_trailing_newline() {
    let sink = MemorySink::new();
    let result = aggregate_report(
        "mc0:csrow0:DIMM_A:CE:1\nmc0:csrow1:DIMM_B:CE:2",
        &sink,
        Severity::Alert,
    );
    assert_eq!(result.total, 3);
    assert_eq!(sink.len(), 2);
}

#[test]
fn messages_follow_report_order() {
    let sink = MemorySink::new();
    aggregate_report(
        "mc0:csrow0:A:CE:1\nbroken\nmc0:csrow1:B:UE:2\n",
        &sink,
        Severity::Alert,
    );
    let messages = sink.at(Severity::Alert);
    assert!(messages[0].ends_with("on A (mc0/csrow0)"));
    assert!(messages[1].starts_with("Unparsed line"));
    assert!(messages[2].ends_with("on B (mc0/csrow1)"));
}
