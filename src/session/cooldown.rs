//! Caller-side pause after a rate-limited call.

use std::time::{Duration, Instant};

/// Default pause after the provider reports rate limiting.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Longest window honored; larger configured values are clamped to this.
pub const MAX_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

/// Fixed-window cooldown for one session.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    until: Option<Instant>,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.min(MAX_COOLDOWN),
            until: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start (or restart) the cooldown from now.
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    /// Remaining wait, or `None` once the window has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_at(Instant::now())
    }

    /// Remaining wait in whole seconds, rounded up.
    pub fn remaining_secs(&self) -> Option<u64> {
        self.remaining().map(ceil_secs)
    }

    pub fn is_active(&self) -> bool {
        self.remaining().is_some()
    }

    fn trigger_at(&mut self, now: Instant) {
        // `now` itself may sit near the platform's Instant limit.
        self.until = Some(now.checked_add(self.window).unwrap_or(now));
    }

    fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.until
            .map(|until| until.saturating_duration_since(now))
            .filter(|left| !left.is_zero())
    }
}

/// Whole seconds, rounded up.
pub(crate) fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
