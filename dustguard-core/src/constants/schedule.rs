//! Duty-Cycle Timing Constants
//!
//! The laser diode of the SDS011 is rated for roughly 8000 hours of
//! operation, a little under a year of continuous use. Keeping the pause
//! five times longer than the working window stretches that to about six
//! years.

/// Default working window: laser and fan on, samples collected
pub const DEFAULT_WORKING_MS: u32 = 20_000;

/// Default pause between working windows.
///
/// Six times the default working window; anything from 5:1 up gives the
/// laser a multi-year lifetime.
pub const DEFAULT_PAUSE_MS: u32 = 120_000;

/// Default time between consecutive samples inside a working window.
///
/// The sensor pushes one frame per second in active reporting mode, so
/// sampling faster only re-reads the same frame.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 1_000;

/// Default number of leading samples discarded as warm-up
pub const DEFAULT_SKIP_COUNT: usize = 1;

/// Wait between sending the version query and reading the reply.
///
/// Shorter waits (< 80 ms) were observed to miss the reply; 100 ms is
/// reliable.
pub const IDENTITY_SETTLE_MS: u32 = 100;

/// Maximum recommended gap between two `poll()` calls
pub const MAX_POLL_GAP_MS: u32 = 1_000;
