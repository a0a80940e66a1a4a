//! Plain stderr sink used by one-shot mode.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use super::{LogSink, Severity};

/// Writes each message as one line on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    /// A sink that never emits color codes.
    #[must_use]
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// A sink that colors alerts red and status lines dimmed.
    #[must_use]
    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Color only when stderr is a terminal.
    #[must_use]
    pub fn auto() -> Self {
        use std::io::IsTerminal;
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    #[must_use]
    pub fn format(&self, severity: Severity, message: &str) -> String {
        if !self.color {
            return message.to_string();
        }
        match severity {
            Severity::Alert => message.red().bold().to_string(),
            Severity::Error => message.red().to_string(),
            Severity::Info => message.dimmed().to_string(),
        }
    }
}

impl LogSink for ConsoleSink {
    fn log(&self, severity: Severity, message: &str) {
        let line = self.format(severity, message);
        let mut stderr = io::stderr().lock();
        if let Err(e) = writeln!(stderr, "{line}") {
            tracing::warn!(error = %e, "Failed to write report line to stderr");
        }
    }
}
