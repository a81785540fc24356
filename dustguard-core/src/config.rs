//! Duty-cycle schedule configuration
//!
//! The schedule is the tuple {working time, pause time, sample interval,
//! skip count}. It trades laser lifetime against measurement freshness: the
//! default keeps the sensor asleep six times as long as it works, above
//! the 5:1 ratio that gives the laser a multi-year lifetime.
//!
//! Schedules can be built in code or loaded from JSON:
//!
//! ```rust
//! use dustguard_core::ScheduleConfig;
//!
//! let json = r#"{"working_ms":30000,"pause_ms":150000,"sample_interval_ms":1000,"skip_count":3}"#;
//! let config: ScheduleConfig = serde_json::from_str(json).unwrap();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.expected_samples(), 30);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        buffers::SAMPLE_CAPACITY,
        schedule::{
            DEFAULT_PAUSE_MS, DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_SKIP_COUNT, DEFAULT_WORKING_MS,
        },
    },
    errors::{Error, Result},
};

/// Duty-cycle timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// How long the sensor works (laser and fan on) per cycle
    pub working_ms: u32,

    /// How long the sensor sleeps between working windows
    pub pause_ms: u32,

    /// Time between two samples inside a working window
    pub sample_interval_ms: u32,

    /// Leading samples of each working window left out of the statistics
    pub skip_count: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            working_ms: DEFAULT_WORKING_MS,   // 20s of laser time
            pause_ms: DEFAULT_PAUSE_MS,       // 2 minutes asleep
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            skip_count: DEFAULT_SKIP_COUNT,   // first reading after wake-up is unreliable
        }
    }
}

impl ScheduleConfig {
    /// Build and validate a schedule
    pub fn new(
        working_ms: u32,
        pause_ms: u32,
        sample_interval_ms: u32,
        skip_count: usize,
    ) -> Result<Self> {
        let config = Self {
            working_ms,
            pause_ms,
            sample_interval_ms,
            skip_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// Zero-pause preset: the sensor never sleeps and a result is produced
    /// every `working_ms`.
    ///
    /// Useful for bench calibration; running the laser continuously wears it
    /// out in under a year.
    pub fn continuous(working_ms: u32) -> Self {
        Self {
            working_ms,
            pause_ms: 0,
            ..Self::default()
        }
    }

    /// Check that the schedule can produce a result.
    ///
    /// Rejects:
    /// - a zero working time or sample interval
    /// - a skip count that leaves no sample for the statistics
    /// - a working window that can take more samples than the accumulator
    ///   holds, counting a trailing partial interval as one more sample
    ///
    /// A zero pause is allowed and keeps the sensor working continuously.
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval_ms == 0 {
            return Err(Error::InvalidSchedule { reason: "sample interval is zero" });
        }

        if self.working_ms == 0 {
            return Err(Error::InvalidSchedule { reason: "working time is zero" });
        }

        let expected = self.expected_samples();
        if self.skip_count >= expected {
            return Err(Error::InvalidSchedule {
                reason: "skip count leaves no samples for statistics",
            });
        }

        if self.max_samples() > SAMPLE_CAPACITY {
            return Err(Error::InvalidSchedule {
                reason: "working window holds more samples than the buffer",
            });
        }

        Ok(())
    }

    /// Samples one working window is expected to collect
    pub fn expected_samples(&self) -> usize {
        if self.sample_interval_ms == 0 {
            return 0;
        }
        (self.working_ms / self.sample_interval_ms) as usize
    }

    /// Most samples one working window can take
    ///
    /// A window that is not a whole number of intervals fits one more sample
    /// tick than [`expected_samples`](Self::expected_samples) when the last
    /// tick lands on the poll that ends the window.
    pub fn max_samples(&self) -> usize {
        if self.sample_interval_ms == 0 {
            return 0;
        }
        self.working_ms.div_ceil(self.sample_interval_ms) as usize
    }

    /// Fraction of time the laser is on
    pub fn duty_cycle(&self) -> f32 {
        let period = self.working_ms as f32 + self.pause_ms as f32;
        if period == 0.0 {
            return 0.0;
        }
        self.working_ms as f32 / period
    }
}
