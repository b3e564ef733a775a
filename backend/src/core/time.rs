//! Clock abstraction for hold/completion timestamps
//!
//! The engine stamps `hold_at` / `completed_at` when a token enters the
//! corresponding state. Historical ordering only needs the timestamps to be
//! monotonic non-decreasing; wall-clock accuracy is not required, so the
//! system clock is wrapped with a clamp instead of being trusted directly.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of millisecond timestamps for the queue engine.
///
/// Implementations must be monotonic non-decreasing: a later call never
/// returns a smaller value than an earlier one.
pub trait Clock {
    /// Current time in milliseconds since the UNIX epoch (or any fixed origin).
    fn now_millis(&mut self) -> u64;
}

/// System clock clamped to non-decreasing values.
///
/// `SystemTime` can step backwards (NTP adjustment); the clamp keeps the
/// engine's historical ordering intact across such steps.
///
/// # Example
/// ```
/// use clinic_queue_core_rs::{Clock, MonotonicClock};
///
/// let mut clock = MonotonicClock::new();
/// let a = clock.now_millis();
/// let b = clock.now_millis();
/// assert!(b >= a);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MonotonicClock {
    last: u64,
}

impl MonotonicClock {
    /// Create a new system-backed clock
    pub fn new() -> Self {
        Self { last: 0 }
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&mut self) -> u64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(self.last);
        self.last = self.last.max(wall);
        self.last
    }
}

/// Manually advanced clock for tests
///
/// # Example
/// ```
/// use clinic_queue_core_rs::{Clock, ManualClock};
///
/// let mut clock = ManualClock::new(1_000);
/// assert_eq!(clock.now_millis(), 1_000);
/// clock.advance(500);
/// assert_eq!(clock.now_millis(), 1_500);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: u64,
}

impl ManualClock {
    /// Create a clock frozen at the given millisecond value
    pub fn new(now: u64) -> Self {
        Self { now }
    }

    /// Advance the clock by `delta` milliseconds
    pub fn advance(&mut self, delta: u64) {
        self.now += delta;
    }
}

impl Clock for ManualClock {
    fn now_millis(&mut self) -> u64 {
        self.now
    }
}
