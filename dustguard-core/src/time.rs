//! Time management for the duty cycle
//!
//! Provides the clock abstraction the controller reads on every poll and the
//! interval timer it schedules phases with:
//! - `TimeSource`: anything that can report milliseconds
//! - `MonotonicTime` / `SystemTime`: host clocks (requires std)
//! - `FixedTime`: a hand-driven clock for tests and simulations
//! - `IntervalTimer`: elapsed-time bookkeeping with fixed-step advance

use core::cell::Cell;

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Source of time for the system
///
/// The controller only ever looks at differences between two readings, so
/// the epoch does not matter. It must not go backwards; a clock that does is
/// treated as "no time has passed".
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Monotonic time source counting from its creation (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Hand-driven time source for testing and simulation
///
/// Interior mutability lets a test keep advancing the clock while the
/// controller holds a shared reference to it.
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Cell<Timestamp>,
}

impl FixedTime {
    /// Create a clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: Cell::new(timestamp) }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move the clock forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get() + ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

/// Elapsed-time bookkeeping for one schedule anchor
///
/// The controller keeps two of these: one for the phase (when did the
/// current sleep or working window begin) and one for sampling. Expiry is
/// strict: a timer with period `p` anchored at `t` expires at any time
/// greater than `t + p`.
///
/// There are two ways to re-arm a timer:
/// - [`advance`](Self::advance) moves the anchor by exactly one period, so
///   late polls do not push the following deadlines back.
/// - [`reset`](Self::reset) moves the anchor to the current time, absorbing
///   any overrun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    anchor: Timestamp,
}

impl IntervalTimer {
    /// Create a timer anchored at `now`
    pub const fn new(now: Timestamp) -> Self {
        Self { anchor: now }
    }

    /// Current anchor
    pub fn anchor(&self) -> Timestamp {
        self.anchor
    }

    /// Milliseconds since the anchor, zero if the clock is behind it
    pub fn elapsed(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.anchor)
    }

    /// Check whether strictly more than `period_ms` has passed
    pub fn expired(&self, now: Timestamp, period_ms: u32) -> bool {
        self.elapsed(now) > u64::from(period_ms)
    }

    /// Move the anchor forward by exactly one period
    pub fn advance(&mut self, period_ms: u32) {
        self.anchor += u64::from(period_ms);
    }

    /// Re-anchor at `now`
    pub fn reset(&mut self, now: Timestamp) {
        self.anchor = now;
    }

    /// Advance by one period if expired; returns whether it fired
    pub fn fire_fixed(&mut self, now: Timestamp, period_ms: u32) -> bool {
        if self.expired(now, period_ms) {
            self.advance(period_ms);
            true
        } else {
            false
        }
    }
}
