//! SIGINT/SIGTERM handling for the poll loop.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Await a signal future, treating a registration failure as "never fires".
///
/// A handler that cannot be installed resolves immediately with `Err`;
/// that must not be mistaken for a shutdown request.
pub async fn signal_or_pending<F>(name: &str, signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!(signal = name, error = %e, "Could not listen for signal");
        std::future::pending::<()>().await;
    }
}

/// Resolve on the first SIGINT or (on Unix) SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = signal_or_pending("SIGINT", tokio::signal::ctrl_c());

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let term = async {
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    term.recv().await;
                }
                Err(e) => {
                    tracing::warn!(signal = "SIGTERM", error = %e, "Could not listen for signal");
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            () = ctrl_c => {}
            () = term => {}
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}

/// Cancel `token` once a shutdown signal arrives.
pub fn spawn_shutdown_handler(token: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        token.cancel();
    });
}
