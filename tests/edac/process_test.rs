//! Tests for running the report tool as a real child process.

use std::io::Write;

use edac_monitor::edac::{EdacUtil, ExecutionError, ReportSource};

fn fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[cfg(unix)]
#[tokio::test]
async fn fetch_returns_full_stdout() {
    let report = "mc0:csrow0:DIMM_A:CE:0\nmc0:csrow1:DIMM_B:UE:2\n";
    let file = fixture(report);
    let runner = EdacUtil::new("cat").args([file.path().to_string_lossy().into_owned()]);

    assert_eq!(runner.fetch().await.unwrap(), report);
}

#[cfg(unix)]
#[tokio::test]
async fn invalid_utf8_is_decoded_lossily() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"mc0:csrow0:\xff:CE:1\n").unwrap();
    file.flush().unwrap();
    let runner = EdacUtil::new("cat").args([file.path().to_string_lossy().into_owned()]);

    let out = runner.fetch().await.unwrap();
    assert!(out.contains('\u{fffd}'));
    assert!(out.starts_with("mc0:csrow0:"));
}

#[cfg(unix)]
#[tokio::test]
async fn failing_tool_reports_exit_status() {
    let runner = EdacUtil::new("false").args(Vec::<String>::new());
    match runner.fetch().await {
        Err(ExecutionError::Failed { binary, status, .. }) => {
            assert_eq!(binary, "false");
            assert!(!status.success());
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_tool_is_not_found() {
    let runner = EdacUtil::new("/nonexistent/edac-util");
    let err = runner.fetch().await.unwrap_err();
    assert!(matches!(err, ExecutionError::NotFound { .. }));
    assert_eq!(err.to_string(), "/nonexistent/edac-util not found");
}

#[test]
fn builder_is_clone() {
    let runner = EdacUtil::new("edac-util").args(["--report=full"]);
    let cloned = runner.clone();
    assert_eq!(cloned.binary(), runner.binary());
    assert_eq!(cloned.get_args(), runner.get_args());
}
