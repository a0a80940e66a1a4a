//! Poll loop tests on a paused clock.

use std::sync::Arc;
use std::time::Duration;

use edac_monitor::monitor::{PollLoop, PollOutcome, PollSettings, STOPPED_MESSAGE};
use edac_monitor::sink::{MemorySink, Severity};
use tokio_util::sync::CancellationToken;

use super::ScriptedSource;

fn settings(delay_secs: u64, log_zero_secs: u64) -> PollSettings {
    PollSettings {
        delay: Duration::from_secs(delay_secs),
        log_zero: Duration::from_secs(log_zero_secs),
        binary: "edac-util".to_string(),
    }
}

async fn run_for(poller: &mut PollLoop<ScriptedSource, Arc<MemorySink>>, secs: u64) {
    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        stopper.cancel();
    });
    poller.run(cancel).await;
}

#[tokio::test(start_paused = true)]
async fn healthy_reports_never_logged_when_disabled() {
    let sink = Arc::new(MemorySink::new());
    let mut poller = PollLoop::new(
        ScriptedSource::always("mc0:csrow0:DIMM_A:CE:0\n"),
        sink.clone(),
        settings(10, 0),
    );

    run_for(&mut poller, 600).await;

    assert!(poller.stats().iterations >= 60);
    assert_eq!(
        sink.at(Severity::Info),
        vec![
            "Polling EDAC every 10s, logging only when errors occur.".to_string(),
            STOPPED_MESSAGE.to_string(),
        ]
    );
    assert!(sink.at(Severity::Alert).is_empty());
}

#[tokio::test(start_paused = true)]
async fn healthy_reports_at_most_once_per_window() {
    let sink = Arc::new(MemorySink::new());
    let mut poller = PollLoop::new(ScriptedSource::always(""), sink.clone(), settings(10, 60));

    // Polls at t = 0, 10, ..., 290.
    run_for(&mut poller, 295).await;

    let healthy: Vec<_> = sink
        .at(Severity::Info)
        .into_iter()
        .filter(|m| m == "EDAC reports no errors.")
        .collect();
    // Logged at t = 0, 70, 140, 210, 280.
    assert_eq!(healthy.len(), 5);
    assert_eq!(
        sink.at(Severity::Info)[0],
        "Polling EDAC every 10s, logging every 1m0s even if no errors reported."
    );
}

#[tokio::test(start_paused = true)]
async fn errors_do_not_reset_throttle() {
    let sink = Arc::new(MemorySink::new());
    let source = ScriptedSource::new(vec![Ok(""), Ok("mc0:csrow0:DIMM_A:UE:1\n"), Ok("")]);
    let mut poller = PollLoop::new(source, sink.clone(), settings(10, 60));

    assert_eq!(poller.poll_once().await, PollOutcome::Healthy { logged: true });
    tokio::time::advance(Duration::from_secs(10)).await;
    assert_eq!(poller.poll_once().await, PollOutcome::ErrorsFound(1));
    tokio::time::advance(Duration::from_secs(10)).await;
    assert_eq!(poller.poll_once().await, PollOutcome::Healthy { logged: false });
}

#[tokio::test(start_paused = true)]
async fn failures_still_wait_for_next_poll() {
    let sink = Arc::new(MemorySink::new());
    let source = ScriptedSource::new(vec![Err("edac-util")]);
    let mut poller = PollLoop::new(source, sink.clone(), settings(10, 0));

    run_for(&mut poller, 35).await;

    // t = 0, 10, 20, 30: a failed poll does not skip the sleep.
    assert_eq!(poller.stats().iterations, 4);
    assert_eq!(poller.stats().failures, 4);
    assert_eq!(sink.at(Severity::Error).len(), 4);
}

#[tokio::test(start_paused = true)]
async fn summary_follows_line_alerts() {
    let sink = Arc::new(MemorySink::new());
    let source = ScriptedSource::always("mc0:csrow0:A:CE:2\nbad\nmc0:csrow1:B:CE:5\n");
    let mut poller = PollLoop::new(source, sink.clone(), settings(10, 0));

    assert_eq!(poller.poll_once().await, PollOutcome::ErrorsFound(7));
    let messages = sink.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(
        messages.last().unwrap(),
        &(Severity::Error, "EDAC reports a total of 7 errors.".to_string())
    );
    assert!(messages[..3].iter().all(|(s, _)| *s == Severity::Alert));
}

#[tokio::test]
async fn cancelled_before_start_runs_nothing() {
    let sink = Arc::new(MemorySink::new());
    let mut poller = PollLoop::new(ScriptedSource::always(""), sink.clone(), settings(10, 0));
    let cancel = CancellationToken::new();
    cancel.cancel();

    poller.run(cancel).await;

    assert_eq!(poller.stats().iterations, 0);
    assert_eq!(sink.len(), 2);
}
