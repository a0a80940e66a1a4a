//! Rate limit for "no errors" status lines.

use std::time::Duration;

use tokio::time::Instant;

/// Tracks when a healthy report was last logged.
///
/// An interval of zero disables healthy-state logging entirely. The first
/// healthy report after creation is always logged; after that, one is
/// logged only once strictly more than `interval` has passed.
#[derive(Debug, Clone)]
pub struct ZeroLogThrottle {
    interval: Duration,
    last_logged: Option<Instant>,
}

impl ZeroLogThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_logged: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    #[must_use]
    pub fn last_logged(&self) -> Option<Instant> {
        self.last_logged
    }

    /// Whether a healthy report seen at `now` should be logged.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match self.last_logged {
            Some(last) => now.saturating_duration_since(last) > self.interval,
            None => true,
        }
    }

    /// Check [`is_due`](Self::is_due) and, if so, record `now` as the last log time.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let due = self.is_due(now);
        if due {
            self.last_logged = Some(now);
        }
        tracing::trace!(due, interval = ?self.interval, "Zero-log throttle check");
        due
    }
}
