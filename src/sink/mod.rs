//! Destinations for report messages.
//!
//! Every component that emits alerts or status lines takes a [`LogSink`]
//! and a [`Severity`]; the binary decides where the lines end up (syslog,
//! stderr, or the tracing subscriber).

mod console;
mod memory;
#[cfg(unix)]
mod syslog;
mod tracing_sink;

use std::fmt;
use std::sync::Arc;

pub use console::*;
pub use memory::*;
#[cfg(unix)]
pub use syslog::*;
pub use tracing_sink::*;

/// Severity of a report message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Per-line alerts and parse diagnostics.
    Alert,
    /// Totals and invocation failures.
    Error,
    /// Startup and "no errors" status lines.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alert => "alert",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// A line-oriented message destination.
///
/// Implementations must not fail the caller: write errors are reported
/// through `tracing` and the message is dropped.
pub trait LogSink: Send + Sync {
    /// Emit one message at the given severity.
    fn log(&self, severity: Severity, message: &str);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log(&self, severity: Severity, message: &str) {
        (**self).log(severity, message);
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn log(&self, severity: Severity, message: &str) {
        (**self).log(severity, message);
    }
}

/// Errors that can occur while setting up a sink.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    /// No syslog socket could be reached.
    #[error("Could not connect to syslog (tried {tried}): {source}")]
    SyslogUnavailable {
        tried: String,
        #[source]
        source: std::io::Error,
    },
}
