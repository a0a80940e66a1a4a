//! One-shot mode tests.

use std::time::Duration;

use edac_monitor::monitor::{run_once, OneShotOutcome};
use edac_monitor::sink::{MemorySink, Severity};

use super::ScriptedSource;

#[tokio::test]
async fn errors_exit_two_and_print_total() {
    let sink = MemorySink::new();
    let source = ScriptedSource::always("mc0:csrow0:DIMM_A:CE:3\n");

    let outcome = run_once(&source, "edac-util", &sink, Duration::ZERO).await;

    assert!(matches!(outcome, OneShotOutcome::ErrorsFound(3)));
    assert_eq!(outcome.code(), 2);
    assert_eq!(
        sink.messages(),
        vec![
            (
                Severity::Alert,
                "EDAC reports 3 corrected errors on DIMM_A (mc0/csrow0)".to_string()
            ),
            (
                Severity::Error,
                "EDAC reports a total of 3 errors.".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn clean_report_is_silent_without_log_zero() {
    let sink = MemorySink::new();
    let source = ScriptedSource::always("mc0:csrow0:DIMM_A:UE:0\n");

    let outcome = run_once(&source, "edac-util", &sink, Duration::ZERO).await;

    assert!(matches!(outcome, OneShotOutcome::Clean));
    assert_eq!(outcome.code(), 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn clean_report_logs_when_log_zero_set() {
    let sink = MemorySink::new();
    let source = ScriptedSource::always("");

    let outcome = run_once(&source, "edac-util", &sink, Duration::from_secs(60)).await;

    assert_eq!(outcome.code(), 0);
    assert_eq!(
        sink.at(Severity::Info),
        vec!["EDAC reports no errors.".to_string()]
    );
}

#[tokio::test]
async fn execution_failure_exits_one() {
    let sink = MemorySink::new();
    let source = ScriptedSource::new(vec![Err("edac-util")]);

    let outcome = run_once(&source, "edac-util", &sink, Duration::from_secs(60)).await;

    assert!(matches!(outcome, OneShotOutcome::Failed(_)));
    assert_eq!(outcome.code(), 1);
    assert_eq!(
        sink.at(Severity::Error),
        vec!["Error running edac-util: edac-util not found".to_string()]
    );
    assert!(sink.at(Severity::Info).is_empty());
}

#[tokio::test]
async fn garbage_only_report_is_clean() {
    let sink = MemorySink::new();
    let source = ScriptedSource::always("garbage line\n");

    let outcome = run_once(&source, "edac-util", &sink, Duration::ZERO).await;

    assert_eq!(outcome.code(), 0);
    assert_eq!(
        sink.at(Severity::Alert),
        vec!["Unparsed line in edac-util output: garbage line".to_string()]
    );
}
